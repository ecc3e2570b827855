//! Plain-text rendering of each view.
//!
//! Every function returns the text instead of printing it so the layout can
//! be tested.

use std::fmt::Write;

use carebridge_core::models::{
    Activity, Child, Client, Comment, GrowthLog, Mentor, MentoringSession, Post, Resource, User,
};
use carebridge_core::nav::{nav_links, Route};

use crate::utils::{
    format_date, format_datetime, format_measure, format_optional, pluralize, truncate_string,
};

/// Width of free-text columns
const TEXT_COLUMN_WIDTH: usize = 48;

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

fn empty(out: &mut String, what: &str) {
    let _ = writeln!(out, "  No {} yet.", what);
}

/// Header shown above every signed-in view
pub fn header(user: &User, current: Route) -> String {
    let links: Vec<String> = nav_links(user.role)
        .into_iter()
        .map(|route| {
            if route == current {
                format!("[{}]", route.title())
            } else {
                route.title().to_string()
            }
        })
        .collect();
    format!(
        "({}) {} <{}> | {}\n{}\n",
        user.initial(),
        user.name,
        user.role,
        links.join("  "),
        "=".repeat(TEXT_COLUMN_WIDTH)
    )
}

pub fn whoami(user: &User) -> String {
    format!(
        "{} <{}>\nRole: {}\nUser ID: {}\n",
        user.name, user.email, user.role, user.user_id
    )
}

pub fn children(children: &[Child]) -> String {
    let mut out = String::new();
    section(&mut out, "Children");
    if children.is_empty() {
        empty(&mut out, "children");
        return out;
    }
    for child in children {
        let _ = writeln!(
            out,
            "  #{:<5} {:<24} age {:<4} {}",
            child.child_id,
            truncate_string(&child.name, 24),
            child.age_str(),
            format_optional(&child.gender, "")
        );
        if let Some(ref diagnosed) = child.diagnosis_date {
            let _ = writeln!(out, "         diagnosed {}", format_date(diagnosed));
        }
    }
    out
}

pub fn growth_logs(logs: &[GrowthLog]) -> String {
    let mut out = String::new();
    section(&mut out, "Growth log");
    if logs.is_empty() {
        empty(&mut out, "measurements");
        return out;
    }
    for log in logs {
        let _ = writeln!(
            out,
            "  {:<13} height {:<10} weight {:<9} head {:<9} {}",
            log.recorded_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
            format_measure(log.height_cm, "cm"),
            format_measure(log.weight_kg, "kg"),
            format_measure(log.head_circumference_cm, "cm"),
            truncate_string(&format_optional(&log.note, ""), TEXT_COLUMN_WIDTH)
        );
    }
    out
}

pub fn activities(activities: &[Activity]) -> String {
    let mut out = String::new();
    section(&mut out, "Activities");
    if activities.is_empty() {
        empty(&mut out, "activities");
        return out;
    }
    for activity in activities {
        let _ = writeln!(
            out,
            "  {:<20} {:<9} {}",
            activity
                .scheduled_time
                .as_deref()
                .map(format_datetime)
                .unwrap_or_else(|| "unscheduled".to_string()),
            activity.activity_type,
            truncate_string(&activity.title, TEXT_COLUMN_WIDTH)
        );
    }
    out
}

pub fn mentors(mentors: &[Mentor]) -> String {
    let mut out = String::new();
    section(&mut out, "Available mentors");
    if mentors.is_empty() {
        empty(&mut out, "mentors");
        return out;
    }
    for mentor in mentors {
        let _ = writeln!(out, "  #{:<5} {:<24} {}", mentor.user_id, mentor.name, mentor.email);
    }
    out
}

pub fn my_mentor(mentor: Option<&Mentor>) -> String {
    match mentor {
        Some(m) => format!("Your mentor: {} <{}>\n", m.name, m.email),
        None => "No mentor connected. Run `carebridge mentors` to find one.\n".to_string(),
    }
}

pub fn clients(clients: &[Client]) -> String {
    let mut out = String::new();
    section(&mut out, "My clients");
    if clients.is_empty() {
        empty(&mut out, "clients");
        return out;
    }
    for client in clients {
        let _ = writeln!(
            out,
            "  {:<24} {:<28} children: {}",
            truncate_string(&client.name, 24),
            client.email,
            client.children_display()
        );
    }
    out
}

pub fn sessions(sessions: &[MentoringSession]) -> String {
    let mut out = String::new();
    section(&mut out, "Mentoring sessions");
    if sessions.is_empty() {
        empty(&mut out, "sessions");
        return out;
    }
    for session in sessions {
        let _ = writeln!(
            out,
            "  {:<20} {}",
            session
                .start_time
                .as_deref()
                .map(format_datetime)
                .unwrap_or_else(|| "-".to_string()),
            truncate_string(&session.title, TEXT_COLUMN_WIDTH)
        );
        if let Some(ref link) = session.meeting_link {
            let _ = writeln!(out, "  {:<20} {}", "", link);
        }
    }
    out
}

pub fn resources(resources: &[Resource], category: Option<&str>) -> String {
    let mut out = String::new();
    match category {
        Some(c) => section(&mut out, &format!("Resources: {}", c)),
        None => section(&mut out, "Resources"),
    }
    if resources.is_empty() {
        empty(&mut out, "resources");
        return out;
    }
    for resource in resources {
        let _ = writeln!(
            out,
            "  #{:<5} [{}] {} ({})",
            resource.resource_id,
            format_optional(&resource.category, "General"),
            truncate_string(&resource.title, TEXT_COLUMN_WIDTH),
            format_optional(&resource.kind, "Article")
        );
        if let Some(ref url) = resource.url {
            let _ = writeln!(out, "         {}", url);
        }
        if let Some(ref author) = resource.author_name {
            let _ = writeln!(out, "         by {}", author);
        }
    }
    out
}

pub fn posts(posts: &[Post], channel: Option<&str>) -> String {
    let mut out = String::new();
    match channel {
        Some(c) => section(&mut out, &format!("Community: {}", c)),
        None => section(&mut out, "Community"),
    }
    if posts.is_empty() {
        empty(&mut out, "posts");
        return out;
    }
    for post in posts {
        let _ = writeln!(
            out,
            "  #{:<5} {} in {} on {}",
            post.post_id,
            format_optional(&post.author_name, "Anonymous"),
            format_optional(&post.category, "General"),
            post.created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string())
        );
        let _ = writeln!(out, "         {}", post.content);
        let _ = writeln!(
            out,
            "         {}, {}",
            pluralize(post.likes_count, "like"),
            pluralize(post.comment_count, "comment")
        );
    }
    out
}

pub fn comments(comments: &[Comment]) -> String {
    let mut out = String::new();
    section(&mut out, "Comments");
    if comments.is_empty() {
        empty(&mut out, "comments");
        return out;
    }
    for comment in comments {
        let _ = writeln!(
            out,
            "  {}: {}",
            format_optional(&comment.author_name, "Anonymous"),
            comment.content
        );
    }
    out
}
