//! # Tag Data Transfer Objects

use entity::tags::{self, DEFAULT_TAG_COLOR};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id:    i32,
    pub name:  String,
    pub color: String,
}

impl From<&tags::Model> for TagResponse {
    fn from(tag: &tags::Model) -> Self {
        Self {
            id:    tag.id,
            name:  tag.name.clone(),
            color: tag.color.clone(),
        }
    }
}

/// Request body for a new tag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Tag name must be between 1 and 50 characters"))]
    pub name:  String,
    /// `#RRGGBB`, defaults to blue
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

impl CreateTagRequest {
    pub fn color_or_default(&self) -> String { self.color.clone().unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()) }
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7 &&
        color.starts_with('#') &&
        color[1 ..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    }
    else {
        Err(ValidationError::new("color").with_message("Color must be a hex value like #3B82F6".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_validation() {
        assert!(validate_color("#10B981").is_ok());
        assert!(validate_color("#10b981").is_ok());
        assert!(validate_color("10B981").is_err());
        assert!(validate_color("#10B98").is_err());
        assert!(validate_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_default_color() {
        let req = CreateTagRequest {
            name:  "Mentoring".to_string(),
            color: None,
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.color_or_default(), "#3B82F6");
    }
}
