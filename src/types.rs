use derive_more::{Display, From, Into};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend workflow identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

/// Object path inside the backend's storage bucket (`sketches/abc.png`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct BlobPath(pub String);

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `/auth/login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct LoginResponse {
    #[serde(rename = "idToken")]
    pub id_token: String,
    pub email: String,
}

/// One generated image tied to a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Generation {
    pub generation_id: String,
    #[serde(default)]
    pub material_id: Option<String>,
    pub created_at: String,
    pub image_url: String,
    pub image_blob_path: BlobPath,
}

/// A design workflow as listed by `/workflows/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sketch_url: Option<String>,
    #[serde(default)]
    pub sketch_blob_path: Option<BlobPath>,
    #[serde(default)]
    pub generations_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A workflow together with its most recent generation
/// (`/workflows/latest-generation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct WorkflowWithGeneration {
    #[serde(flatten)]
    pub workflow: Workflow,
    #[serde(default)]
    pub latest_generation: Option<Generation>,
}

/// `/workflows/{id}`: the workflow and every generation in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct WorkflowDetail {
    pub workflow: Workflow,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub generations: Vec<Generation>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Body for `POST /workflows/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewWorkflow<'a> {
    pub name: &'a str,
}

/// A named storage collection and how many designs it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// `/storage/collections` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
}

/// Body for `POST /storage/create-bucket`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCollection<'a> {
    pub collection_name: &'a str,
}

/// Signed, short-lived download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadUrl {
    pub download_url: String,
}

/// Which backend path produced a generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStrategy {
    Primary,
    Fallback,
    Other(String),
}

impl GenerationStrategy {
    /// Parse a strategy header value; casing is ignored.
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "primary" => Self::Primary,
            "fallback" => Self::Fallback,
            _ => Self::Other(trimmed.to_owned()),
        }
    }
}

/// Image returned by `/sketch-to-image/shoe`.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub strategy: Option<GenerationStrategy>,
}

/// An image file sent as the multipart `file` field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// A PNG upload.
    #[must_use]
    pub fn png(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "image/png".into(),
            bytes,
        }
    }
}

/// Attributes sent with a design saved to the library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignAttributes {
    pub material: String,
    pub color: String,
    pub toe: String,
}
