//! Form payloads accepted by the mutation endpoints, with their field rules.
//!
//! Each `validate` collects every failing field before returning so a client
//! can redisplay the whole form at once. Checks that need storage (unique
//! slugs, existing categories) happen in the handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, User};
use crate::error::ValidationErrors;

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;
/// Directory post images are stored under, relative to the media root.
pub const POST_IMAGE_DIR: &str = "post_images/";
pub const MAX_IMAGE_PATH_LEN: usize = 100;

const REQUIRED: &str = "This field is required.";

fn default_true() -> bool {
    true
}

/// Latin letters, digits, hyphen and underscore.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        return false;
    }
    true
}

/// A stored image path: relative, inside [`POST_IMAGE_DIR`], no `..` segments.
fn is_post_image_path(path: &str) -> bool {
    path.strip_prefix(POST_IMAGE_DIR).is_some_and(|name| {
        !name.is_empty()
            && !name.contains('\\')
            && name.split('/').all(|segment| !segment.is_empty() && segment != "..")
    })
}

fn check_max_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

/// Post create/edit form. Author and publication flag are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<Uuid>,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: Some(post.pub_date),
            location: post.location_id,
            category: post.category_id,
            image: post.image.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if check_required(&mut errors, "title", &self.title) {
            check_max_len(&mut errors, "title", &self.title, MAX_TITLE_LEN);
        }
        check_required(&mut errors, "text", &self.text);
        if self.pub_date.is_none() {
            errors.add("pub_date", REQUIRED);
        }
        if let Some(image) = self.image.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !is_post_image_path(image) {
                errors.add("image", format!("Image must be a file under {POST_IMAGE_DIR}."));
            } else {
                check_max_len(&mut errors, "image", image, MAX_IMAGE_PATH_LEN);
            }
        }
        errors.into_result()
    }

    /// Build a new post for `author_id`; call after `validate`.
    pub fn into_post(self, author_id: Uuid) -> Post {
        let mut post = Post::new(author_id, String::new(), String::new(), Utc::now());
        self.apply(&mut post);
        post
    }

    /// Copy the editable fields onto `post`.
    pub fn apply(self, post: &mut Post) {
        post.title = self.title.trim().to_string();
        post.text = self.text;
        if let Some(pub_date) = self.pub_date {
            post.pub_date = pub_date;
        }
        post.location_id = self.location;
        post.category_id = self.category;
        post.image = self
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    }
}

/// Comment add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "text", &self.text);
        errors.into_result()
    }
}

/// Profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_username(&mut errors, &self.username);
        check_max_len(&mut errors, "first_name", &self.first_name, MAX_USERNAME_LEN);
        check_max_len(&mut errors, "last_name", &self.last_name, MAX_USERNAME_LEN);
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        errors.into_result()
    }

    pub fn apply(self, user: &mut User) {
        user.username = self.username.trim().to_string();
        user.first_name = self.first_name.trim().to_string();
        user.last_name = self.last_name.trim().to_string();
        user.email = self.email.trim().to_string();
        user.updated_at = Utc::now();
    }
}

fn validate_username(errors: &mut ValidationErrors, username: &str) {
    if !check_required(errors, "username", username) {
        return;
    }
    let username = username.trim();
    check_max_len(errors, "username", username, MAX_USERNAME_LEN);
    if !is_valid_slug(username) {
        errors.add(
            "username",
            "Enter a valid username: letters, numbers, hyphens and underscores only.",
        );
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_username(&mut errors, &self.username);
        if check_required(&mut errors, "password1", &self.password1)
            && self.password1.chars().count() < MIN_PASSWORD_LEN
        {
            errors.add(
                "password1",
                format!("This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."),
            );
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        errors.into_result()
    }
}

/// Sign-in form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "username", &self.username);
        check_required(&mut errors, "password", &self.password);
        errors.into_result()
    }
}

/// Admin category form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if check_required(&mut errors, "title", &self.title) {
            check_max_len(&mut errors, "title", &self.title, MAX_TITLE_LEN);
        }
        check_required(&mut errors, "description", &self.description);
        if check_required(&mut errors, "slug", &self.slug) && !is_valid_slug(self.slug.trim()) {
            errors.add(
                "slug",
                "Enter a valid slug: latin letters, digits, hyphens and underscores only.",
            );
        }
        errors.into_result()
    }

    pub fn into_category(self) -> Category {
        let mut category = Category::new(String::new(), String::new(), String::new());
        self.apply(&mut category);
        category
    }

    pub fn apply(self, category: &mut Category) {
        category.title = self.title.trim().to_string();
        category.description = self.description;
        category.slug = self.slug.trim().to_string();
        category.is_published = self.is_published;
    }
}

/// Admin location form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

impl LocationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if check_required(&mut errors, "name", &self.name) {
            check_max_len(&mut errors, "name", &self.name, MAX_TITLE_LEN);
        }
        errors.into_result()
    }

    pub fn into_location(self) -> Location {
        let mut location = Location::new(String::new());
        self.apply(&mut location);
        location
    }

    pub fn apply(self, location: &mut Location) {
        location.name = self.name.trim().to_string();
        location.is_published = self.is_published;
    }
}
