use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Image upload failed: {0}")]
    Failed(String),

    #[error("Image host returned no URL")]
    MissingUrl,
}

/// What the image host hands back for one upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadedImage {
    pub url: Option<String>,
}

impl UploadedImage {
    /// The durable reference, if the host produced a usable one.
    pub fn into_url(self) -> Result<String, UploadError> {
        match self.url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(UploadError::MissingUrl),
        }
    }
}

/// Image-host seam. The upload protocol lives entirely behind this trait.
#[async_trait]
pub trait AvatarUploader: Send + Sync {
    async fn upload(&self, file_name: &str, file: Bytes) -> Result<UploadedImage, UploadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_is_missing() {
        let image = UploadedImage {
            url: Some("  ".to_string()),
        };
        assert!(matches!(image.into_url(), Err(UploadError::MissingUrl)));
        assert!(matches!(
            UploadedImage::default().into_url(),
            Err(UploadError::MissingUrl)
        ));
    }

    #[test]
    fn test_host_reply_deserializes() {
        let image: UploadedImage = serde_json::from_str(
            r#"{"url": "https://res.cloudinary.com/demo/avatar.png", "bytes": 5120}"#,
        )
        .unwrap();
        assert_eq!(
            image.into_url().unwrap(),
            "https://res.cloudinary.com/demo/avatar.png"
        );
    }
}
