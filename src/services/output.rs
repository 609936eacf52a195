use crate::domain::models::JsonOut;
use serde::Serialize;

/// Prints either the `{ok, data}` JSON envelope or the text rendering.
pub fn print_one<T: Serialize>(
    json: bool,
    ok: bool,
    data: &T,
    text: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok, data })?
        );
    } else {
        println!("{}", text(data));
    }
    Ok(())
}

/// Writes a document to `output` when given, stdout otherwise.
pub fn emit_document(output: Option<&std::path::Path>, body: &str) -> anyhow::Result<()> {
    match output {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(p, body)?;
            tracing::info!(output = %p.display(), bytes = body.len(), "wrote document");
        }
        None => println!("{}", body),
    }
    Ok(())
}
