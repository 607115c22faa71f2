//! Origami model command for the MakeIt CLI.

use std::io::Write;

use color_eyre::Result;

use crate::client::MakeItClient;
use crate::error::ClientError;
use crate::traits::HttpClient;

/// Handle the --fold command.
///
/// Without an id, lists the available models. With one, prints a summary of
/// the crease pattern followed by its SVG rendering. Returns `false` when the
/// model does not exist.
pub async fn handle_fold_command<C: HttpClient, W: Write>(
    client: &MakeItClient<C>,
    model_id: Option<&str>,
    out: &mut W,
) -> Result<bool> {
    let Some(model_id) = model_id else {
        let models = client.list_fold_models().await?;
        if models.is_empty() {
            writeln!(out, "No origami models available.")?;
        }
        for model in &models {
            writeln!(out, "{:<16} {}", model.id, model.label())?;
        }
        return Ok(true);
    };

    let model = match client.get_fold(model_id).await {
        Ok(model) => model,
        Err(ClientError::NotFound { message, .. }) => {
            writeln!(out, "{}", message)?;
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    writeln!(out, "{}", model.summary(model_id))?;

    let svg = client.fold_svg(model_id).await?;
    writeln!(out, "{}", svg.trim_end())?;
    Ok(true)
}
