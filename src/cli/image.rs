//! Image command for the MakeIt CLI.

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use crate::client::MakeItClient;
use crate::models::{media_type_for_path, ImageRequest};
use crate::traits::HttpClient;

/// Read and encode an image file for upload.
pub async fn load_image_request(path: &Path, message: Option<&str>) -> Result<ImageRequest> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read image {}", path.display()))?;

    let request = ImageRequest::from_bytes(&bytes, media_type_for_path(path));
    Ok(match message {
        Some(message) => request.with_message(message),
        None => request,
    })
}

/// Handle the --image command.
pub async fn handle_image_command<C: HttpClient, W: Write>(
    client: &MakeItClient<C>,
    path: &Path,
    message: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let request = load_image_request(path, message).await?;
    tracing::debug!(
        path = %path.display(),
        media_type = %request.media_type,
        encoded_len = request.image_base64.len(),
        "Uploading image for analysis"
    );

    let response = client.analyze_image(&request).await?;
    writeln!(out, "{}", response.analysis)?;
    Ok(())
}
