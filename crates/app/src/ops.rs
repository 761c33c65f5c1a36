use common::contents::{Content, ReadOptions, Router};

pub fn ls(router: &Router, path: &str) -> anyhow::Result<()> {
    for entry in router.list(path)? {
        let marker = if entry.entry_type.is_dir() { "/" } else { "" };
        println!("{}{marker}", entry.path);
    }
    Ok(())
}

pub fn cat(router: &Router, path: &str) -> anyhow::Result<()> {
    let model = router.get(path, ReadOptions::with_content())?;
    match model.content {
        Some(Content::Json(body)) => println!("{}", serde_json::to_string_pretty(&body)?),
        Some(Content::Text(text)) => print!("{text}"),
        Some(Content::Listing(_)) | None => {
            anyhow::bail!("{path} is not a document");
        }
    }
    Ok(())
}

pub fn checkpoints(router: &Router, path: &str) -> anyhow::Result<()> {
    let checkpoints = router.list_checkpoints(path)?;
    if checkpoints.is_empty() {
        println!("no checkpoints");
        return Ok(());
    }
    for checkpoint in checkpoints {
        println!("{}  (modified {})", checkpoint.id, checkpoint.last_modified);
    }
    Ok(())
}
