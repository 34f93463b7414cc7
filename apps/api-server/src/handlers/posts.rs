//! Post scheduling and sharing handlers.
//!
//! Persistence follows an explicit two-phase contract: handlers run the share
//! workflow's validation first and only then resolve scheduling and save, so
//! no post is ever stored in an inconsistent state.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use cadence_core::domain::{Platform, Post};
use cadence_core::share::ShareOptions;
use cadence_shared::ApiResponse;
use cadence_shared::dto::{CreatePostRequest, PostResponse, SharePostRequest, UpdatePostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        content: post.content.clone(),
        share_now: post.share_now,
        share_at: post.share_at,
        share_start_at: post.share_start_at,
        share_complete_at: post.share_complete_at,
        share_on_linkedin: post.share_on_linkedin,
        shared_at_linkedin: post.shared_at_linkedin,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn parse_platform(name: Option<&str>) -> Result<Platform, AppError> {
    match name {
        None => Ok(Platform::Linkedin),
        Some(name) => Platform::from_name(name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown platform: {name}"))),
    }
}

/// Load a post the caller may act on. Other users' posts are reported as
/// missing rather than forbidden, except to admins.
async fn owned_post(state: &AppState, identity: &Identity, id: Uuid) -> Result<Post, AppError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.user_id != identity.user_id && !identity.has_role("admin") {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    Ok(post)
}

/// POST /api/posts
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut post = Post::new(identity.user_id, req.content);
    post.share_now = req.share_now;
    post.share_at = req.share_at;
    post.share_on_linkedin = req.share_on_linkedin;

    state.share.validate(&post).await?;
    post.resolve_scheduling(Utc::now());

    let saved = state.posts.save(post).await?;
    Ok(HttpResponse::Created().json(post_response(&saved)))
}

/// GET /api/posts - the caller's posts.
pub async fn list_mine(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_user_id(identity.user_id).await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let mut post = owned_post(&state, &identity, path.into_inner()).await?;
    let req = body.into_inner();

    // Content is mutable only until the post has been published somewhere.
    if post.is_published() && req.content.is_some() {
        return Err(AppError::Conflict(
            "Published posts can no longer be edited".to_string(),
        ));
    }

    if let Some(content) = req.content {
        post.content = content;
    }
    if let Some(share_now) = req.share_now {
        post.share_now = Some(share_now);
    }
    if let Some(share_at) = req.share_at {
        post.share_at = Some(share_at);
    }
    if let Some(flag) = req.share_on_linkedin {
        post.share_on_linkedin = flag;
    }

    state.share.validate(&post).await?;
    let now = Utc::now();
    post.resolve_scheduling(now);
    post.updated_at = now;

    let saved = state.posts.save(post).await?;
    Ok(HttpResponse::Ok().json(post_response(&saved)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    state.posts.delete(post.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/share
///
/// Publishes the post to the requested platform right away. Safe to retry:
/// an already-shared post comes back unchanged.
pub async fn share(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<SharePostRequest>>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    let req = body.map(|b| b.into_inner()).unwrap_or(SharePostRequest {
        platform: None,
        dry_run: false,
    });

    let platform = parse_platform(req.platform.as_deref())?;
    let options = ShareOptions {
        dry_run: req.dry_run,
        persist: !req.dry_run,
    };

    let shared = state
        .share
        .perform_share(post, platform, Utc::now(), options)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(&shared)))
}

/// POST /api/posts/share-due - admin trigger for due scheduled shares.
///
/// The stand-in for an external scheduler: publishes every post whose
/// `share_at` has passed for each platform it requests. Redundant calls are
/// harmless thanks to the workflow's idempotency gate.
pub async fn share_due(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    if !identity.has_role("admin") {
        return Err(AppError::Forbidden);
    }

    let now = Utc::now();
    let options = ShareOptions {
        dry_run: false,
        persist: true,
    };
    let mut shared = 0usize;
    let mut failed = 0usize;

    for platform in Platform::ALL {
        let due = state.posts.find_due(platform, now).await?;
        for post in due {
            let post_id = post.id;
            match state.share.perform_share(post, platform, now, options).await {
                Ok(_) => shared += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(post_id = %post_id, %platform, error = %e, "due share failed");
                }
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({
        "shared": shared,
        "failed": failed,
    }))))
}
