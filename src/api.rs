//! Typed calls for the endpoints the ShoeFastDesigner screens consume.
//!
//! Each call returns `Ok(None)` when the backend invalidated the session
//! (`401`); see [`ApiClient::fetch`].

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value as JsonValue;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::types::{
    BlobPath, Collection, CollectionList, DesignAttributes, DownloadUrl, GeneratedImage,
    GenerationStrategy, ImageUpload, NewCollection, NewWorkflow, Workflow, WorkflowDetail,
    WorkflowId, WorkflowWithGeneration,
};

/// Response header telling which generation path the backend took.
pub const STRATEGY_HEADER: &str = "x-generation-strategy";

impl ApiClient {
    /// Turn a sketch into a generated shoe image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure or [`Error::Api`] if the
    /// backend rejects the sketch.
    pub async fn generate_shoe(&self, sketch: ImageUpload) -> Result<Option<GeneratedImage>, Error> {
        let form = Form::new().part("file", image_part(sketch)?);
        let Some(response) = self
            .fetch("/sketch-to-image/shoe", RequestOptions::post().with_body(form))
            .await?
        else {
            return Ok(None);
        };

        let headers = response.headers();
        let strategy = headers
            .get(STRATEGY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(GenerationStrategy::from_header);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if let Some(strategy) = &strategy {
            tracing::debug!(?strategy, "Shoe generated");
        }

        let bytes = response.bytes().await?.to_vec();
        Ok(Some(GeneratedImage {
            bytes,
            content_type,
            strategy,
        }))
    }

    /// All workflows of the current user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn list_workflows(&self) -> Result<Option<Vec<Workflow>>, Error> {
        self.fetch_json("/workflows/", RequestOptions::new()).await
    }

    /// Start a new named workflow.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn create_workflow(&self, name: &str) -> Result<Option<Workflow>, Error> {
        let options = RequestOptions::post().with_json(&NewWorkflow { name })?;
        self.fetch_json("/workflows/", options).await
    }

    /// A workflow and all of its generations.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn get_workflow(&self, id: &WorkflowId) -> Result<Option<WorkflowDetail>, Error> {
        self.fetch_json(&format!("/workflows/{id}"), RequestOptions::new())
            .await
    }

    /// Mark a workflow as closed. Returns `Some(())` on success.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn close_workflow(&self, id: &WorkflowId) -> Result<Option<()>, Error> {
        let response = self
            .fetch(&format!("/workflows/{id}/close"), RequestOptions::patch())
            .await?;
        Ok(response.map(|_| ()))
    }

    /// Every workflow with its most recent generation (the design library).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn latest_generations(&self) -> Result<Option<Vec<WorkflowWithGeneration>>, Error> {
        self.fetch_json("/workflows/latest-generation", RequestOptions::new())
            .await
    }

    /// A signed download link for a stored object.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn download_url(&self, blob_path: &BlobPath) -> Result<Option<String>, Error> {
        let path = blob_path.0.trim_start_matches('/');
        let link: Option<DownloadUrl> = self
            .fetch_json(
                &format!("/workflows/generate-download-url/{path}"),
                RequestOptions::new(),
            )
            .await?;
        Ok(link.map(|l| l.download_url))
    }

    /// Storage collections with their item counts.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn collections(&self) -> Result<Option<Vec<Collection>>, Error> {
        let list: Option<CollectionList> = self
            .fetch_json("/storage/collections", RequestOptions::new())
            .await?;
        Ok(list.map(|l| l.collections))
    }

    /// Create an empty collection. Returns `Some(())` on success.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create_collection(&self, name: &str) -> Result<Option<()>, Error> {
        let options = RequestOptions::post().with_json(&NewCollection {
            collection_name: name,
        })?;
        let response = self.fetch("/storage/create-bucket", options).await?;
        Ok(response.map(|_| ()))
    }

    /// Save a generated image to the library. Returns `Some(())` on success.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn save_design(
        &self,
        image: ImageUpload,
        attributes: &DesignAttributes,
    ) -> Result<Option<()>, Error> {
        let form = Form::new()
            .part("file", image_part(image)?)
            .text("material", attributes.material.clone())
            .text("color", attributes.color.clone())
            .text("toe", attributes.toe.clone());
        let response = self
            .fetch("/storage/save", RequestOptions::post().with_body(form))
            .await?;
        Ok(response.map(|_| ()))
    }

    /// Leather catalogue, passed through as raw JSON.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn leathers(&self) -> Result<Option<JsonValue>, Error> {
        self.fetch_json("/storage/leathers", RequestOptions::new())
            .await
    }
}

fn image_part(upload: ImageUpload) -> Result<Part, Error> {
    Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)
        .map_err(|e| Error::InvalidRequest(format!("content type: {e}")))
}
