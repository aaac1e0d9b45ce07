use crate::paths::{ConfigError, QuizPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

// toml_edit para escritura preservando comentarios
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;

  /// Like [`ConfigBackend::load_section`], but a missing file or section yields `T::default()`.
  fn load_section_or_default<T: DeserializeOwned + Default>(&self, section: &str) -> Result<T, ConfigError>;

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: QuizPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: QuizPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &QuizPaths {
    &self.paths
  }

  fn read_table(&self) -> Result<Option<toml::Table>, ConfigError> {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };

    Ok(Some(toml::from_str(&content)?))
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, value: &toml::Value) -> Result<T, ConfigError> {
  value.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let table = self.read_table()?.ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;
    let value = table.get(section).ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;

    decode_section(section, value)
  }

  fn load_section_or_default<T: DeserializeOwned + Default>(&self, section: &str) -> Result<T, ConfigError> {
    let Some(table) = self.read_table()? else {
      return Ok(T::default());
    };

    let Some(value) = table.get(section) else {
      return Ok(T::default());
    };

    decode_section(section, value)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // 1) Leer config actual como DocumentMut o crear doc vacío si no existe.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) Serializar la sección con `toml` normal (serde).
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    // 3) Reparsear como tabla de toml_edit para poder insertarla.
    let section_doc = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?;
    let section_item = Item::Table(section_doc.as_table().clone());

    // 4) Reemplazar la sección preservando comentarios del resto del archivo.
    doc[section] = section_item;

    snipquiz_fs::atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}
