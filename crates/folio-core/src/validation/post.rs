use serde_json::Value;

use super::{FieldReader, Mode};
use crate::error::FieldErrors;
use crate::slug::is_valid_slug;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 30;

/// Validated create-post payload. `content` is still raw Markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub slug: Option<String>,
    pub featured_image: Option<String>,
}

/// Validated partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub slug: Option<String>,
    /// `Some(None)` clears the image.
    pub featured_image: Option<Option<String>>,
}

struct PostFields {
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
    published: Option<bool>,
    slug: Option<String>,
    featured_image: Option<Option<String>>,
}

fn read_post(reader: &mut FieldReader<'_>) -> PostFields {
    let title = reader.text("title", true);
    let content = reader.raw_string("content", true).map(str::to_string);

    let tags = reader
        .string_array("tags", true)
        .and_then(|raw| match normalize_tags(&raw) {
            Ok(tags) => Some(tags),
            Err(messages) => {
                for message in messages {
                    reader.error("tags", message);
                }
                None
            }
        });

    let published = reader.boolean("published");

    let slug = reader.text("slug", false).and_then(|slug| {
        if is_valid_slug(&slug) {
            Some(slug)
        } else {
            reader.error(
                "slug",
                "must contain only lowercase letters, digits and single hyphens",
            );
            None
        }
    });

    let featured_image = reader.url("featuredImage");

    PostFields {
        title,
        content,
        tags,
        published,
        slug,
        featured_image,
    }
}

/// Validate a full post payload.
pub fn validate_new_post(payload: &Value) -> Result<NewPost, FieldErrors> {
    let mut reader = FieldReader::new(payload, Mode::Create);
    let fields = read_post(&mut reader);
    let post = NewPost {
        title: fields.title.unwrap_or_default(),
        content: fields.content.unwrap_or_default(),
        tags: fields.tags.unwrap_or_default(),
        published: fields.published.unwrap_or(false),
        slug: fields.slug,
        featured_image: fields.featured_image.flatten(),
    };
    reader.finish(post)
}

/// Validate a partial post payload.
pub fn validate_post_patch(payload: &Value) -> Result<PostPatch, FieldErrors> {
    let mut reader = FieldReader::new(payload, Mode::Update);
    let fields = read_post(&mut reader);
    reader.finish(PostPatch {
        title: fields.title,
        content: fields.content,
        tags: fields.tags,
        published: fields.published,
        slug: fields.slug,
        featured_image: fields.featured_image,
    })
}

/// Trim, lowercase and deduplicate tags, checking every rule.
///
/// Returns one message per violation; duplicates that differ only by case or
/// surrounding whitespace are merged rather than rejected.
pub fn normalize_tags(raw: &[&str]) -> Result<Vec<String>, Vec<String>> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    let mut problems = Vec::new();

    for (index, tag) in raw.iter().enumerate() {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            problems.push(format!("tag {index} must not be empty"));
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            problems.push(format!(
                "tag '{tag}' must be at most {MAX_TAG_LENGTH} characters"
            ));
            continue;
        }
        if !tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '_')
        {
            problems.push(format!(
                "tag '{tag}' may only contain letters, digits, spaces, '-' and '_'"
            ));
            continue;
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    // Counted over the tags that passed the per-tag rules.
    if tags.len() > MAX_TAGS {
        problems.push(format!("at most {MAX_TAGS} tags are allowed"));
    } else if tags.is_empty() && problems.is_empty() {
        problems.push("at least one tag is required".to_string());
    }

    if problems.is_empty() {
        Ok(tags)
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "title": "  Hello, World!  ",
            "content": "# Hi\n\nSome **markdown**.",
            "tags": ["Rust", "web-dev"],
        })
    }

    #[test]
    fn test_valid_post_is_normalized() {
        let post = validate_new_post(&valid_payload()).unwrap();
        assert_eq!(post.title, "Hello, World!");
        assert_eq!(post.tags, vec!["rust", "web-dev"]);
        assert!(!post.published);
        assert_eq!(post.slug, None);
        assert_eq!(post.featured_image, None);
    }

    #[test]
    fn test_duplicate_tags_merge() {
        let post = validate_new_post(&json!({
            "title": "t",
            "content": "c",
            "tags": ["JS", " js "],
        }))
        .unwrap();
        assert_eq!(post.tags, vec!["js"]);
    }

    #[test]
    fn test_eleven_tags_rejected() {
        let tags: Vec<String> = (0..11).map(|i| format!("tag{i}")).collect();
        let errors = validate_new_post(&json!({
            "title": "t",
            "content": "c",
            "tags": tags,
        }))
        .unwrap_err();
        assert_eq!(errors.get("tags"), ["at most 10 tags are allowed"]);
    }

    #[test]
    fn test_tag_count_reported_alongside_bad_tag() {
        let mut tags: Vec<String> = (0..11).map(|i| format!("tag{i}")).collect();
        tags.push("bad!tag".to_string());
        let errors = validate_new_post(&json!({ "title": "t", "content": "c", "tags": tags }))
            .unwrap_err();
        assert_eq!(
            errors.get("tags"),
            [
                "tag 'bad!tag' may only contain letters, digits, spaces, '-' and '_'",
                "at most 10 tags are allowed",
            ]
        );
    }

    #[test]
    fn test_ten_tags_after_dedupe_accepted() {
        let mut tags: Vec<String> = (0..10).map(|i| format!("tag{i}")).collect();
        tags.push("TAG0".to_string());
        let post = validate_new_post(&json!({ "title": "t", "content": "c", "tags": tags }))
            .unwrap();
        assert_eq!(post.tags.len(), 10);
    }

    #[test]
    fn test_each_tag_rule_reported() {
        let long = "x".repeat(31);
        let errors = validate_new_post(&json!({
            "title": "t",
            "content": "c",
            "tags": ["ok", "   ", long, "c++"],
        }))
        .unwrap_err();

        let messages = errors.get("tags");
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("must not be empty"));
        assert!(messages[1].contains("at most 30 characters"));
        assert!(messages[2].contains("may only contain"));
    }

    #[test]
    fn test_tag_with_inner_space_and_underscore_allowed() {
        assert_eq!(
            normalize_tags(&["Web Dev", "snake_case"]).unwrap(),
            vec!["web dev", "snake_case"]
        );
    }

    #[test]
    fn test_all_violations_reported_together() {
        let errors = validate_new_post(&json!({
            "title": "",
            "content": 12,
            "published": "yes",
            "slug": "Not A Slug",
            "featuredImage": "javascript:alert(1)",
        }))
        .unwrap_err();

        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["content", "featuredImage", "published", "slug", "tags", "title"]
        );
        assert_eq!(errors.get("tags"), ["is required"]);
    }

    #[test]
    fn test_explicit_slug_and_image_accepted() {
        let mut payload = valid_payload();
        payload["slug"] = json!("custom-slug");
        payload["featuredImage"] = json!("https://cdn.example.com/a.png");
        payload["published"] = json!(true);

        let post = validate_new_post(&payload).unwrap();
        assert_eq!(post.slug.as_deref(), Some("custom-slug"));
        assert_eq!(
            post.featured_image.as_deref(),
            Some("https://cdn.example.com/a.png")
        );
        assert!(post.published);
    }

    #[test]
    fn test_patch_accepts_empty_payload() {
        assert_eq!(validate_post_patch(&json!({})).unwrap(), PostPatch::default());
    }

    #[test]
    fn test_patch_validates_present_fields() {
        let errors = validate_post_patch(&json!({ "title": "  ", "tags": [] })).unwrap_err();
        assert_eq!(errors.get("title"), ["must not be empty"]);
        assert_eq!(errors.get("tags"), ["at least one tag is required"]);
    }

    #[test]
    fn test_patch_null_image_clears() {
        let patch = validate_post_patch(&json!({ "featuredImage": null })).unwrap();
        assert_eq!(patch.featured_image, Some(None));
    }
}
