//! Best-effort decoding of the user profile and purchased-dojo payloads.
//!
//! Neither payload has a guaranteed shape. Every entry point here accepts
//! whatever arrives (or nothing at all) and falls back to placeholders
//! instead of failing: an unreadable purchase list is empty, an unreadable
//! profile is [`Profile::placeholder`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Avatar shown when the account has no image.
pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

/// Display text for a profile field that was never filled in.
pub const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An id as it appears on the wire: usually a string, sometimes a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_id(self) -> Option<String> {
        match self {
            RawId::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawId::Number(n) => Some(n.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DojoRef {
    pub id: RawId,
    #[serde(default)]
    pub title: Option<String>,
}

/// One entry of a purchase list, in any of the shapes the API has used.
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PurchasedItem {
    /// `"dojo-id"`
    Id(RawId),
    /// `{ "dojo": { "id": "dojo-id", "title": "..." } }`
    Nested { dojo: DojoRef },
    /// `{ "id": "dojo-id" }`
    Object {
        id: RawId,
        #[serde(default)]
        title: Option<String>,
    },
    /// Anything else. Skipped during normalization.
    Unknown(Value),
}

/// A purchase after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Purchase {
    pub id: String,
    pub title: Option<String>,
}

impl PurchasedItem {
    pub fn normalize(self) -> Option<Purchase> {
        let (id, title) = match self {
            PurchasedItem::Id(id) => (id, None),
            PurchasedItem::Nested { dojo } => (dojo.id, dojo.title),
            PurchasedItem::Object { id, title } => (id, title),
            PurchasedItem::Unknown(value) => {
                debug!(item = %value, "Skipping purchase of unknown shape");
                return None;
            }
        };
        Some(Purchase {
            id: id.into_id()?,
            title: title.filter(|t| !t.trim().is_empty()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct PurchasedResponse {
    #[serde(default)]
    purchased: Vec<PurchasedItem>,
}

/// Decode a purchased-dojos response body (`{ "purchased": [...] }`).
pub fn try_purchases(body: &str) -> Result<Vec<Purchase>, ProfileError> {
    let response: PurchasedResponse = serde_json::from_str(body)?;
    Ok(normalize_all(response.purchased))
}

/// Like [`try_purchases`], but a missing or unreadable body yields an
/// empty list.
pub fn purchases(body: Option<&str>) -> Vec<Purchase> {
    match body.map(try_purchases) {
        Some(Ok(list)) => list,
        Some(Err(e)) => {
            debug!(error = %e, "Purchase list unreadable, treating as empty");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn normalize_all(items: Vec<PurchasedItem>) -> Vec<Purchase> {
    items.into_iter().filter_map(PurchasedItem::normalize).collect()
}

/// Text field that tolerates numbers and nulls (a graduation year is
/// sometimes stored as an integer).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Number(serde_json::Number),
    Other(Value),
}

impl LooseText {
    fn into_text(self) -> Option<String> {
        match self {
            LooseText::Text(s) if !s.trim().is_empty() => Some(s),
            LooseText::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Flag that tolerates `"true"`, `1` and other stand-ins for a boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum LooseFlag {
    Flag(bool),
    Text(String),
    Number(serde_json::Number),
    Other(Value),
}

impl LooseFlag {
    fn is_set(&self) -> bool {
        match self {
            LooseFlag::Flag(flag) => *flag,
            LooseFlag::Text(s) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
            }
            LooseFlag::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            LooseFlag::Other(_) => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    name: Option<LooseText>,
    username: Option<LooseText>,
    email: Option<LooseText>,
    image: Option<LooseText>,
    phone: Option<LooseText>,
    college: Option<LooseText>,
    education: Option<LooseText>,
    branch: Option<LooseText>,
    year: Option<LooseText>,
    company: Option<LooseText>,
    signup_completed: Option<LooseFlag>,
}

fn text(field: Option<LooseText>) -> String {
    field.and_then(LooseText::into_text).unwrap_or_default()
}

/// A user profile with every field present. Empty strings mean "not
/// filled in"; use [`Profile::display`] for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub college: String,
    pub education: String,
    pub branch: String,
    pub year: String,
    pub company: String,
    pub signup_completed: bool,
}

impl Profile {
    /// Profile shown when the user record could not be fetched.
    pub fn placeholder() -> Self {
        Self {
            name: String::new(),
            username: String::new(),
            email: String::new(),
            image: DEFAULT_AVATAR.to_string(),
            phone: String::new(),
            college: String::new(),
            education: String::new(),
            branch: String::new(),
            year: String::new(),
            company: String::new(),
            signup_completed: false,
        }
    }

    pub fn try_from_json(body: &str) -> Result<Self, ProfileError> {
        let raw: RawProfile = serde_json::from_str(body)?;
        Ok(Self::from_raw(raw))
    }

    /// Decode a user record, falling back to the placeholder.
    pub fn from_json(body: Option<&str>) -> Self {
        match body.map(Self::try_from_json) {
            Some(Ok(profile)) => profile,
            Some(Err(e)) => {
                debug!(error = %e, "User record unreadable, using placeholder");
                Self::placeholder()
            }
            None => Self::placeholder(),
        }
    }

    fn from_raw(raw: RawProfile) -> Self {
        let image = text(raw.image);
        Self {
            name: text(raw.name),
            username: text(raw.username),
            email: text(raw.email),
            image: if image.is_empty() {
                DEFAULT_AVATAR.to_string()
            } else {
                image
            },
            phone: text(raw.phone),
            college: text(raw.college),
            education: text(raw.education),
            branch: text(raw.branch),
            year: text(raw.year),
            company: text(raw.company),
            signup_completed: raw.signup_completed.is_some_and(|flag| flag.is_set()),
        }
    }

    /// The editable signup fields, in form order.
    pub fn form(&self) -> ProfileForm {
        ProfileForm {
            phone: self.phone.clone(),
            college: self.college.clone(),
            education: self.education.clone(),
            branch: self.branch.clone(),
            year: self.year.clone(),
            company: self.company.clone(),
        }
    }

    /// `(label, value)` rows for display, with [`NOT_PROVIDED`] standing in
    /// for blank fields.
    pub fn display(&self) -> Vec<(&'static str, &str)> {
        [
            ("Name", self.name.as_str()),
            ("Username", self.username.as_str()),
            ("Email", self.email.as_str()),
            ("Phone", self.phone.as_str()),
            ("College", self.college.as_str()),
            ("Education", self.education.as_str()),
            ("Branch", self.branch.as_str()),
            ("Year", self.year.as_str()),
            ("Company", self.company.as_str()),
        ]
        .into_iter()
        .map(|(label, value)| {
            if value.trim().is_empty() {
                (label, NOT_PROVIDED)
            } else {
                (label, value)
            }
        })
        .collect()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Body of a profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub phone: String,
    pub college: String,
    pub education: String,
    pub branch: String,
    pub year: String,
    pub company: String,
}
