use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::validation::{FieldErrors, claim_details, is_valid_email, not_blank};

/// Kind of found item
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Clothing,
    Electronics,
    Accessories,
    Academic,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Clothing,
        Category::Electronics,
        Category::Accessories,
        Category::Academic,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Accessories => "Accessories",
            Category::Academic => "Academic",
            Category::Other => "Other",
        }
    }
}

/// Claim status of an item
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemStatus {
    #[default]
    Unclaimed,
    Claimed,
}

impl ItemStatus {
    pub fn flipped(self) -> Self {
        match self {
            ItemStatus::Unclaimed => ItemStatus::Claimed,
            ItemStatus::Claimed => ItemStatus::Unclaimed,
        }
    }
}

/// Embedded photo, carried on the wire as a `data:<mime>;base64,<payload>` URL.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a whole image file, guessing the MIME type from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self::new(mime.essence_str(), bytes))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn parse_data_url(url: &str) -> ItemResult<Self> {
        let invalid = |reason: &str| ItemError::InvalidImage(reason.to_string());

        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| invalid("expected a data: URL"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing payload separator"))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("only base64 data URLs are supported"))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ItemError::InvalidImage(e.to_string()))?;

        Ok(Self::new(mime, bytes))
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        Self::parse_data_url(&url).map_err(serde::de::Error::custom)
    }
}

/// Person who claimed an item through the public claim flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claimer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub details: String,
}

/// A found item listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    /// Where the item was found
    pub location: String,
    /// Calendar date the item was found (YYYY-MM-DD)
    pub date_found: NaiveDate,
    pub description: String,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    /// Photo as a base64 data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub image_data: Option<ImageData>,
    /// Present only while claimed through the claim flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimer: Option<Claimer>,
}

/// Validated, trimmed fields of a new listing
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub category: Category,
    pub location: String,
    pub date_found: NaiveDate,
    pub description: String,
    pub image_data: Option<ImageData>,
}

impl Item {
    /// Build a fresh unclaimed item with a new id and creation time.
    pub fn new(input: NewItem) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            category: input.category,
            location: input.location,
            date_found: input.date_found,
            description: input.description,
            status: ItemStatus::Unclaimed,
            created_at: Utc::now(),
            image_data: input.image_data,
            claimer: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.status == ItemStatus::Claimed
    }

    /// Attach a claimer. Only unclaimed items can be claimed.
    pub fn claim(&mut self, claimer: Claimer) -> ItemResult<()> {
        if self.is_claimed() {
            return Err(ItemError::AlreadyClaimed(self.id));
        }
        self.status = ItemStatus::Claimed;
        self.claimer = Some(claimer);
        Ok(())
    }

    /// Flip the status. Leaving `claimed` drops the claimer for good.
    pub fn toggle_status(&mut self) -> ItemStatus {
        self.status = self.status.flipped();
        if self.status == ItemStatus::Unclaimed {
            self.claimer = None;
        }
        self.status
    }

    pub fn apply_patch(&mut self, patch: &PatchItem) {
        if patch.toggle_status {
            self.toggle_status();
        }
    }

    /// Lowercased haystack for free-text search.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.description,
            self.location,
            self.category.as_str()
        )
        .to_lowercase()
    }
}

/// Request body for reporting or adding an item.
///
/// Every field may be absent on the wire so that missing fields surface as
/// validation errors rather than parse failures.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Required"))]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Required"))]
    pub category: Option<Category>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Required"))]
    pub location: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Required"))]
    pub date_found: Option<NaiveDate>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Required"))]
    pub description: String,
    /// Optional photo as a base64 data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub image_data: Option<ImageData>,
}

/// `null`, `""` and whitespace-only strings read as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de::IntoDeserializer;

    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            T::deserialize(raw.trim().to_string().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

impl CreateItem {
    /// Validate, then trim free-text fields.
    pub fn into_new_item(self) -> Result<NewItem, FieldErrors> {
        self.validate().map_err(|e| FieldErrors::from(&e))?;

        let (Some(category), Some(date_found)) = (self.category, self.date_found) else {
            return Err(FieldErrors::single("category", "Required"));
        };

        Ok(NewItem {
            title: self.title.trim().to_string(),
            category,
            location: self.location.trim().to_string(),
            date_found,
            description: self.description.trim().to_string(),
            image_data: self.image_data,
        })
    }
}

/// Claim form submitted by a member of the public
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ClaimRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "is_valid_email", message = "Valid email required"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(
        function = "claim_details",
        message = "Add a few details to verify ownership"
    ))]
    pub details: String,
}

impl ClaimRequest {
    pub fn into_claimer(self) -> Result<Claimer, FieldErrors> {
        self.validate().map_err(|e| FieldErrors::from(&e))?;
        Ok(Claimer {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            details: self.details.trim().to_string(),
        })
    }
}

/// Moderation patch; only status toggling is supported
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchItem {
    #[serde(default)]
    pub toggle_status: bool,
}

/// Body of `GET /api/items`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemList {
    pub items: Vec<Item>,
}
