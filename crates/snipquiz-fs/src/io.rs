use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

fn tmp_path_for(path: &Path) -> PathBuf {
  path.with_extension("tmp")
}

/// Escribe `contents` en un archivo temporal hermano y lo renombra sobre `path`.
///
/// Un lector concurrente ve el contenido anterior o el nuevo, nunca uno a medias.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = tmp_path_for(path);

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

/// Variante async de [`atomic_write_str`] para adapters que ya viven en Tokio.
pub async fn atomic_write_str_async(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = tmp_path_for(path);

  {
    let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
    tmp_file.write_all(contents.as_bytes()).await?;
    tmp_file.sync_all().await?;
  }

  tokio::fs::rename(&tmp_path, path).await?;
  Ok(())
}

/// Lee un archivo de texto; `Ok(None)` si no existe.
pub async fn read_to_string_opt(path: &Path) -> io::Result<Option<String>> {
  match tokio::fs::read_to_string(path).await {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn atomic_write_replaces_content_and_leaves_no_tmp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");

    atomic_write_str(&path, "first").unwrap();
    atomic_write_str(&path, "second").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    assert!(!tmp_path_for(&path).exists());
  }

  #[tokio::test]
  async fn async_write_then_read_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");

    assert_eq!(read_to_string_opt(&path).await.unwrap(), None);

    atomic_write_str_async(&path, "[]").await.unwrap();
    assert_eq!(read_to_string_opt(&path).await.unwrap().as_deref(), Some("[]"));
  }
}
