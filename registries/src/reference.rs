//! Image reference parsing.
//!
//! Follows the docker distribution grammar:
//!
//! ```text
//! reference := name [ ":" tag ] [ "@" digest ]
//! name      := [ domain "/" ] path-component [ "/" path-component ]*
//! domain    := domain-component [ "." domain-component ]* [ ":" port ]
//! ```
//!
//! References are not normalized. A name without a domain keeps an empty
//! domain rather than being rewritten to a default registry, so
//! `busybox` has domain `""` and `library/busybox` has domain `library`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Longest permitted name, including the domain.
pub const NAME_TOTAL_LENGTH_MAX: usize = 255;

const PATH_COMPONENT: &str = r"[a-z0-9]+(?:(?:[._]|__|[-]*)[a-z0-9]+)*";
const DOMAIN: &str = r"(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])(?:\.(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]))*(?::[0-9]+)?";
const TAG: &str = r"[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
const DIGEST: &str = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[[:xdigit:]]{32,}";

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let name = format!("(?:{DOMAIN}/)?{PATH_COMPONENT}(?:/{PATH_COMPONENT})*");
    Regex::new(&format!("^({name})(?::({TAG}))?(?:@({DIGEST}))?$"))
        .expect("reference pattern is valid")
});

static ANCHORED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^(?:({DOMAIN})/)?({PATH_COMPONENT}(?:/{PATH_COMPONENT})*)$"
    ))
    .expect("name pattern is valid")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-f0-9]{64}$").expect("identifier pattern is valid"));

/// Reasons an image reference fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// The reference has no repository name.
    #[error("repository name must have at least one component")]
    NameEmpty,

    /// The repository name has upper case characters.
    #[error("repository name must be lowercase")]
    NameContainsUppercase,

    /// The reference does not match the grammar.
    #[error("invalid reference format")]
    InvalidFormat,

    /// The repository name is longer than [`NAME_TOTAL_LENGTH_MAX`].
    #[error("repository name must not be more than 255 characters")]
    NameTooLong,

    /// The digest is not `algorithm:hex`.
    #[error("invalid checksum digest format")]
    DigestInvalidFormat,

    /// The digest's hex part has the wrong length for its algorithm.
    #[error("invalid checksum digest length")]
    DigestInvalidLength,

    /// The digest algorithm is not known.
    #[error("unsupported digest algorithm")]
    DigestUnsupported,
}

/// A content digest such as `sha256:...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Validate `s` as a digest.
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        let (algorithm, encoded) = s.split_once(':').ok_or(ReferenceError::DigestInvalidFormat)?;
        if algorithm.is_empty() || encoded.is_empty() {
            return Err(ReferenceError::DigestInvalidFormat);
        }

        let size = match algorithm {
            "sha256" => 64,
            "sha384" => 96,
            "sha512" => 128,
            _ => return Err(ReferenceError::DigestUnsupported),
        };

        if encoded.len() != size {
            return Err(ReferenceError::DigestInvalidLength);
        }
        if !encoded.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ReferenceError::DigestInvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// The algorithm part, e.g. `sha256`.
    pub fn algorithm(&self) -> &str {
        self.0.split_once(':').map_or("", |(algorithm, _)| algorithm)
    }

    /// The hex-encoded part.
    pub fn encoded(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, encoded)| encoded)
    }

    /// The full digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Repository {
    domain: String,
    path: String,
}

/// A parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    repository: Option<Repository>,
    tag: Option<String>,
    digest: Option<Digest>,
}

/// View of a reference which carries a repository name.
#[derive(Debug, Clone, Copy)]
pub struct Named<'r> {
    repository: &'r Repository,
}

impl<'r> Named<'r> {
    /// Registry domain, or `""` when the name has none.
    pub fn domain(&self) -> &'r str {
        &self.repository.domain
    }

    /// Repository path below the domain.
    pub fn path(&self) -> &'r str {
        &self.repository.path
    }

    /// The full name, `domain/path`.
    pub fn name(&self) -> String {
        if self.repository.domain.is_empty() {
            self.repository.path.clone()
        } else {
            format!("{}/{}", self.repository.domain, self.repository.path)
        }
    }
}

impl Reference {
    /// Parse a named reference.
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        let Some(captures) = REFERENCE.captures(s) else {
            if s.is_empty() {
                return Err(ReferenceError::NameEmpty);
            }
            if REFERENCE.is_match(&s.to_lowercase()) {
                return Err(ReferenceError::NameContainsUppercase);
            }
            return Err(ReferenceError::InvalidFormat);
        };

        let name = captures.get(1).map_or("", |m| m.as_str());
        if name.len() > NAME_TOTAL_LENGTH_MAX {
            return Err(ReferenceError::NameTooLong);
        }

        let repository = match ANCHORED_NAME.captures(name) {
            Some(parts) => Repository {
                domain: parts.get(1).map_or("", |m| m.as_str()).to_owned(),
                path: parts.get(2).map_or("", |m| m.as_str()).to_owned(),
            },
            None => Repository {
                domain: String::new(),
                path: name.to_owned(),
            },
        };

        let tag = captures.get(2).map(|m| m.as_str().to_owned());
        let digest = captures.get(3).map(|m| Digest::parse(m.as_str())).transpose()?;

        Ok(Self {
            repository: Some(repository),
            tag,
            digest,
        })
    }

    /// Parse a named reference, a bare digest, or a 64 character hex image id.
    ///
    /// Digests and ids produce a reference without a name.
    pub fn parse_any(s: &str) -> Result<Self, ReferenceError> {
        if IDENTIFIER.is_match(s) {
            return Ok(Self::from_digest(Digest(format!("sha256:{s}"))));
        }
        if let Ok(digest) = Digest::parse(s) {
            return Ok(Self::from_digest(digest));
        }
        Self::parse(s)
    }

    /// A reference which is only a digest.
    pub fn from_digest(digest: Digest) -> Self {
        Self {
            repository: None,
            tag: None,
            digest: Some(digest),
        }
    }

    /// The reference's repository name, if it has one.
    pub fn named(&self) -> Option<Named<'_>> {
        self.repository
            .as_ref()
            .map(|repository| Named { repository })
    }

    /// Tag, without the leading `:`.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Digest, without the leading `@`.
    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.named() {
            Some(named) => {
                write!(f, "{}", named.name())?;
                if let Some(tag) = &self.tag {
                    write!(f, ":{tag}")?;
                }
                if let Some(digest) = &self.digest {
                    write!(f, "@{digest}")?;
                }
                Ok(())
            }
            None => match &self.digest {
                Some(digest) => write!(f, "{digest}"),
                None => Ok(()),
            },
        }
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "sha256:ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

    fn domain_and_path(s: &str) -> (String, String) {
        let reference = Reference::parse(s).unwrap();
        let named = reference.named().unwrap();
        (named.domain().to_owned(), named.path().to_owned())
    }

    #[test]
    fn full_reference() {
        let reference = Reference::parse("example.com/foo/bar:latest").unwrap();
        let named = reference.named().unwrap();
        assert_eq!(named.domain(), "example.com");
        assert_eq!(named.path(), "foo/bar");
        assert_eq!(reference.tag(), Some("latest"));
        assert_eq!(reference.digest(), None);
    }

    #[test]
    fn domains() {
        assert_eq!(domain_and_path("busybox"), ("".into(), "busybox".into()));
        assert_eq!(
            domain_and_path("library/busybox"),
            ("library".into(), "busybox".into())
        );
        assert_eq!(
            domain_and_path("localhost:5000/app"),
            ("localhost:5000".into(), "app".into())
        );
        assert_eq!(
            domain_and_path("Registry.Example.com/team/app"),
            ("Registry.Example.com".into(), "team/app".into())
        );
    }

    #[test]
    fn tag_and_digest() {
        let reference = Reference::parse(&format!("quay.io/app:v1.2@{SHA}")).unwrap();
        assert_eq!(reference.tag(), Some("v1.2"));
        assert_eq!(reference.digest().unwrap().algorithm(), "sha256");
        assert_eq!(reference.to_string(), format!("quay.io/app:v1.2@{SHA}"));
    }

    #[test]
    fn invalid_references() {
        assert_eq!(Reference::parse(""), Err(ReferenceError::NameEmpty));
        assert_eq!(
            Reference::parse("!!!not a ref!!!"),
            Err(ReferenceError::InvalidFormat)
        );
        assert_eq!(
            Reference::parse("example.com/Foo"),
            Err(ReferenceError::NameContainsUppercase)
        );
        assert_eq!(Reference::parse("foo:"), Err(ReferenceError::InvalidFormat));
        assert_eq!(Reference::parse("foo//bar"), Err(ReferenceError::InvalidFormat));
    }

    #[test]
    fn name_length_limit() {
        let name = "a".repeat(NAME_TOTAL_LENGTH_MAX);
        assert!(Reference::parse(&name).is_ok());

        let name = "a".repeat(NAME_TOTAL_LENGTH_MAX + 1);
        assert_eq!(Reference::parse(&name), Err(ReferenceError::NameTooLong));
    }

    #[test]
    fn digest_validation() {
        let short = format!("app@sha256:{}", "f".repeat(32));
        assert_eq!(
            Reference::parse(&short),
            Err(ReferenceError::DigestInvalidLength)
        );

        let unknown = format!("app@md5:{}", "f".repeat(32));
        assert_eq!(
            Reference::parse(&unknown),
            Err(ReferenceError::DigestUnsupported)
        );

        assert_eq!(
            Digest::parse(&format!("sha256:{}", "F".repeat(64))),
            Err(ReferenceError::DigestInvalidFormat)
        );
    }

    #[test]
    fn any_reference_may_be_unnamed() {
        let reference = Reference::parse_any(SHA).unwrap();
        assert!(reference.named().is_none());
        assert_eq!(reference.to_string(), SHA);

        let id = "f".repeat(64);
        let reference = Reference::parse_any(&id).unwrap();
        assert!(reference.named().is_none());
        assert_eq!(reference.digest().unwrap().encoded(), id);

        assert!(Reference::parse_any("busybox").unwrap().named().is_some());
    }
}
