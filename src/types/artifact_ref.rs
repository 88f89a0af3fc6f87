// ABOUTME: Immutable artifact reference parsing and validation.
// ABOUTME: Handles formats like app, app:tag, registry/app:tag@digest.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseArtifactRefError {
    #[error("artifact reference cannot be empty")]
    Empty,

    #[error("invalid character in artifact reference: {0}")]
    InvalidChar(char),

    #[error("invalid artifact reference format: {0}")]
    InvalidFormat(String),
}

/// A reference to a previously built, immutable artifact.
///
/// Produced upstream by the build and push stages; this tool only consumes
/// it. A reference pinned by digest names the exact same bytes forever,
/// while a tag-only reference can drift between deploys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ArtifactRef {
    pub fn parse(input: &str) -> Result<Self, ParseArtifactRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseArtifactRefError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric()
                && c != '/'
                && c != ':'
                && c != '.'
                && c != '-'
                && c != '_'
                && c != '@'
            {
                return Err(ParseArtifactRefError::InvalidChar(c));
            }
        }

        // Split off digest if present
        let (without_digest, digest) = match input.split_once('@') {
            Some((before, after)) => (before, Some(after.to_string())),
            None => (input, None),
        };

        // Split off tag if present
        let (without_tag, tag) = match without_digest.rsplit_once(':') {
            Some((before, after)) => {
                // A colon inside the registry component is a port number, not
                // a tag separator
                if after.contains('/') {
                    (without_digest, None)
                } else {
                    (before, Some(after.to_string()))
                }
            }
            None => (without_digest, None),
        };

        let (registry, name) = Self::parse_registry_and_name(without_tag)?;

        // Default tag to "latest" if no tag and no digest
        let tag = match (&tag, &digest) {
            (None, None) => Some("latest".to_string()),
            _ => tag,
        };

        Ok(Self {
            registry,
            name,
            tag,
            digest,
        })
    }

    fn parse_registry_and_name(
        input: &str,
    ) -> Result<(Option<String>, String), ParseArtifactRefError> {
        // A registry is present if the first component contains a dot or
        // colon, or is "localhost"
        let parts: Vec<&str> = input.splitn(2, '/').collect();

        match parts.as_slice() {
            [name] => Ok((None, (*name).to_string())),
            [first, rest] => {
                if first.contains('.') || first.contains(':') || *first == "localhost" {
                    Ok((Some((*first).to_string()), (*rest).to_string()))
                } else {
                    // No registry, the whole thing is the name (e.g., "team/app")
                    Ok((None, input.to_string()))
                }
            }
            _ => Err(ParseArtifactRefError::InvalidFormat(input.to_string())),
        }
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Whether this reference is pinned to exact content by digest.
    /// Tag-only references can resolve to different bytes over time.
    pub fn is_pinned(&self) -> bool {
        self.digest.is_some()
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

impl Serialize for ArtifactRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArtifactRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ArtifactRef::parse(&value).map_err(serde::de::Error::custom)
    }
}
