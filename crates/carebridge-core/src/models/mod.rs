//! Data models for CareBridge entities.
//!
//! This module contains the data structures exchanged with the CareBridge
//! REST service:
//!
//! - `User`, `Role`: the signed-in account and its access profile
//! - `Child`, `GrowthLog`, `Activity`: parent-side child tracking
//! - `Mentor`, `Client`, `MentoringSession`: mentor matching and sessions
//! - `Resource`: curated library entries
//! - `Post`, `Comment`: community forum

mod de;

pub mod child;
pub mod community;
pub mod mentor;
pub mod resource;
pub mod user;

pub use child::{Activity, ActivityType, Child, GrowthLog, NewActivity, NewChild, NewGrowthLog};
pub use community::{Comment, NewPost, Post, ALL_POSTS_CHANNEL};
pub use mentor::{Client, Mentor, MentoringSession, NewSession};
pub use resource::{NewResource, Resource, ALL_CATEGORIES};
pub use user::{Role, User};
