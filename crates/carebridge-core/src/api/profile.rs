//! Role-scoped access to the data endpoints.
//!
//! A signed-in user gets exactly one of `ParentApi` or `MentorApi`, wrapped in
//! an `AccessProfile`. Endpoints a role may not call simply do not exist on
//! that role's handle. Both expose `shared()` for resources and community.

use reqwest::Method;
use serde::Serialize;

use crate::models::{
    Activity, Child, Client, Comment, GrowthLog, Mentor, MentoringSession, NewActivity, NewChild,
    NewGrowthLog, NewPost, NewResource, NewSession, Post, Resource, Role, User, ALL_CATEGORIES,
    ALL_POSTS_CHANNEL,
};

use super::{ApiClient, ApiError};

/// Data access for the signed-in user, chosen by role
#[derive(Clone)]
pub enum AccessProfile {
    Parent(ParentApi),
    Mentor(MentorApi),
}

impl AccessProfile {
    /// `client` must already carry the user's credential
    pub(crate) fn new(client: ApiClient, user: &User) -> Self {
        match user.role {
            Role::Parent => AccessProfile::Parent(ParentApi { client }),
            Role::Mentor => AccessProfile::Mentor(MentorApi {
                client,
                user_id: user.user_id,
            }),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            AccessProfile::Parent(_) => Role::Parent,
            AccessProfile::Mentor(_) => Role::Mentor,
        }
    }

    pub fn shared(&self) -> SharedApi {
        match self {
            AccessProfile::Parent(api) => api.shared(),
            AccessProfile::Mentor(api) => api.shared(),
        }
    }
}

/// `category` query pair, left off for the catch-all value
fn category_filter<'a>(
    category: Option<&'a str>,
    catch_all: &str,
) -> Vec<(&'static str, &'a str)> {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() && c != catch_all => vec![("category", c)],
        _ => Vec::new(),
    }
}

// ============================================================================
// Shared endpoints
// ============================================================================

/// Endpoints every signed-in role may call
#[derive(Clone)]
pub struct SharedApi {
    client: ApiClient,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    content: &'a str,
}

impl SharedApi {
    /// Fetch the resource library, optionally filtered by category ("All" means no filter)
    pub async fn resources(&self, category: Option<&str>) -> Result<Vec<Resource>, ApiError> {
        self.client
            .get_with_query("/resources", &category_filter(category, ALL_CATEGORIES[0]))
            .await
    }

    /// Fetch community posts, optionally filtered by channel ("All Posts" means no filter)
    pub async fn posts(&self, category: Option<&str>) -> Result<Vec<Post>, ApiError> {
        self.client
            .get_with_query("/community/posts", &category_filter(category, ALL_POSTS_CHANNEL))
            .await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ApiError> {
        self.client.post("/community/posts", post).await
    }

    pub async fn like_post(&self, post_id: i64) -> Result<(), ApiError> {
        self.client
            .send_discarding::<()>(Method::PUT, &format!("/community/posts/{}/like", post_id), None)
            .await
    }

    pub async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.client
            .get(&format!("/community/posts/{}/comments", post_id))
            .await
    }

    pub async fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment, ApiError> {
        self.client
            .post(
                &format!("/community/posts/{}/comments", post_id),
                &CommentBody { content },
            )
            .await
    }

    /// Mentoring sessions visible to the signed-in user
    pub async fn sessions(&self) -> Result<Vec<MentoringSession>, ApiError> {
        self.client.get("/mentor/sessions").await
    }
}

// ============================================================================
// Parent endpoints
// ============================================================================

#[derive(Clone)]
pub struct ParentApi {
    client: ApiClient,
}

#[derive(Serialize)]
struct ConnectBody {
    mentor_id: i64,
}

impl ParentApi {
    pub fn shared(&self) -> SharedApi {
        SharedApi {
            client: self.client.clone(),
        }
    }

    pub async fn children(&self) -> Result<Vec<Child>, ApiError> {
        self.client.get("/children").await
    }

    pub async fn add_child(&self, child: &NewChild) -> Result<Child, ApiError> {
        self.client.post("/children", child).await
    }

    pub async fn growth_logs(&self, child_id: i64) -> Result<Vec<GrowthLog>, ApiError> {
        self.client
            .get(&format!("/children/{}/growth", child_id))
            .await
    }

    pub async fn add_growth_log(
        &self,
        child_id: i64,
        log: &NewGrowthLog,
    ) -> Result<GrowthLog, ApiError> {
        self.client
            .post(&format!("/children/{}/growth", child_id), log)
            .await
    }

    pub async fn activities(&self, child_id: i64) -> Result<Vec<Activity>, ApiError> {
        self.client.get(&format!("/activities/{}", child_id)).await
    }

    pub async fn add_activity(
        &self,
        child_id: i64,
        activity: &NewActivity,
    ) -> Result<Activity, ApiError> {
        self.client
            .post(&format!("/activities/{}", child_id), activity)
            .await
    }

    /// Mentors available to connect with
    pub async fn mentors(&self) -> Result<Vec<Mentor>, ApiError> {
        self.client.get("/mentor/list").await
    }

    pub async fn connect_mentor(&self, mentor_id: i64) -> Result<(), ApiError> {
        self.client
            .send_discarding(Method::POST, "/mentor/connect", Some(&ConnectBody { mentor_id }))
            .await
    }

    /// The connected mentor, or `None` if the parent has not connected yet
    pub async fn my_mentor(&self) -> Result<Option<Mentor>, ApiError> {
        self.client.get("/mentor/my-mentor").await
    }
}

// ============================================================================
// Mentor endpoints
// ============================================================================

#[derive(Clone)]
pub struct MentorApi {
    client: ApiClient,
    user_id: i64,
}

impl MentorApi {
    pub fn shared(&self) -> SharedApi {
        SharedApi {
            client: self.client.clone(),
        }
    }

    /// Parents connected to this mentor
    pub async fn clients(&self) -> Result<Vec<Client>, ApiError> {
        self.client.get("/mentor/my-clients").await
    }

    pub async fn create_session(
        &self,
        session: &NewSession,
    ) -> Result<MentoringSession, ApiError> {
        self.client.post("/mentor/sessions", session).await
    }

    pub async fn create_resource(&self, resource: &NewResource) -> Result<Resource, ApiError> {
        self.client.post("/resources", resource).await
    }

    /// Delete a resource. Only resources this mentor authored may be deleted.
    pub async fn delete_resource(&self, resource: &Resource) -> Result<(), ApiError> {
        if !resource.is_authored_by(self.user_id) {
            return Err(ApiError::AccessDenied(format!(
                "Resource {} belongs to another author",
                resource.resource_id
            )));
        }
        self.client
            .send_discarding::<()>(
                Method::DELETE,
                &format!("/resources/{}", resource.resource_id),
                None,
            )
            .await
    }
}
