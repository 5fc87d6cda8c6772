use aws_sdk_s3::presigning::PresigningConfig;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// How long signed links stay valid.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Classification of a post's stored storage reference.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum StorageRef {
    /// No media attached.
    Absent,
    /// An object-storage location that needs a signed link.
    Object { bucket: String, key: String },
    /// Already a plain URL; passed through unchanged.
    Direct(String),
}

impl StorageRef {
    /// Classifies a stored media reference. Object locations are either
    /// `s3://bucket/key` paths or virtual-hosted
    /// `https://bucket.s3.amazonaws.com/key` URLs; anything else that is
    /// non-empty is a direct URL.
    #[must_use]
    pub fn classify(media: Option<&str>) -> Self {
        let Some(value) = media else {
            return Self::Absent;
        };
        if value.is_empty() {
            return Self::Absent;
        }

        if let Some(path) = value.strip_prefix("s3://")
            && let Some((bucket, key)) = path.split_once('/')
            && !bucket.is_empty()
            && !key.is_empty()
        {
            return Self::Object {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            };
        }

        if let Some(rest) = value
            .strip_prefix("https://")
            .or_else(|| value.strip_prefix("http://"))
            && let Some((host, key)) = rest.split_once('/')
            && let Some(bucket) = host.strip_suffix(".s3.amazonaws.com")
            && !bucket.is_empty()
            && !key.is_empty()
        {
            return Self::Object {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            };
        }

        Self::Direct(value.to_owned())
    }
}

#[derive(Debug, Error)]
#[error("Failed to create signed URL for object {key}: {source}")]
pub struct SignUrlError {
    key: String,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl SignUrlError {
    #[must_use]
    pub fn new(key: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            key: key.into(),
            source: Box::new(source),
        }
    }
}

/// Produces time-limited access links for object-storage locations.
pub trait UrlSigner {
    fn sign(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> impl Future<Output = Result<String, SignUrlError>> + Send;
}

/// Signer backed by S3 presigned GET requests.
#[derive(Debug)]
pub struct S3UrlSigner {
    client: aws_sdk_s3::Client,
}

impl S3UrlSigner {
    #[must_use]
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl UrlSigner for S3UrlSigner {
    async fn sign(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SignUrlError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| SignUrlError::new(key, err))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| SignUrlError::new(key, err))?;

        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_absent() {
        assert_eq!(StorageRef::classify(None), StorageRef::Absent);
        assert_eq!(StorageRef::classify(Some("")), StorageRef::Absent);
    }

    #[test]
    fn s3_scheme_paths_are_objects() {
        assert_eq!(
            StorageRef::classify(Some("s3://mixbucket/pics/cat.jpg")),
            StorageRef::Object {
                bucket: "mixbucket".to_owned(),
                key: "pics/cat.jpg".to_owned(),
            }
        );
    }

    #[test]
    fn virtual_hosted_s3_urls_are_objects() {
        assert_eq!(
            StorageRef::classify(Some("https://mixbucket.s3.amazonaws.com/cat.jpg")),
            StorageRef::Object {
                bucket: "mixbucket".to_owned(),
                key: "cat.jpg".to_owned(),
            }
        );
    }

    #[test]
    fn other_urls_pass_through() {
        assert_eq!(
            StorageRef::classify(Some("https://example.com/cat.jpg")),
            StorageRef::Direct("https://example.com/cat.jpg".to_owned())
        );
    }

    #[test]
    fn bucketless_s3_path_is_not_an_object() {
        assert_eq!(
            StorageRef::classify(Some("s3://mixbucket")),
            StorageRef::Direct("s3://mixbucket".to_owned())
        );
    }
}
