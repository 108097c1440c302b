//! Configuração via TOML.
//!
//! Um único `config.toml` ao lado do executável; campos ausentes usam o
//! valor padrão.

use crate::codec::Format;
use crate::resolver::{DEFAULT_SYMBOL, default_library_name};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Erros ao gravar a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro ao serializar config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro ao gravar {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Onde encontrar a DLL do Core Temp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Nome do arquivo (padrão: `GetCoreTempInfo.dll` no Windows)
    pub name: String,
    /// Função exportada
    pub symbol: String,
    /// Diretório da DLL (vazio = caminho de busca do sistema)
    pub search_dir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: default_library_name(),
            symbol: DEFAULT_SYMBOL.into(),
            search_dir: String::new(),
        }
    }
}

/// Como imprimir a leitura.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// "json", "yaml" ou "binary"
    pub format: Format,
    /// JSON indentado
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Json,
            pretty: true,
        }
    }
}

/// Configuração raiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("coretemp.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.library.name.trim().is_empty() {
            errors.push("Nome da biblioteca não pode ser vazio".into());
        }
        if self.library.symbol.trim().is_empty() {
            errors.push("Nome do símbolo não pode ser vazio".into());
        }
        if self.library.symbol.contains('\0') {
            errors.push(format!("Símbolo inválido: {:?}", self.library.symbol));
        }
        if !self.library.search_dir.is_empty() && !Path::new(&self.library.search_dir).is_dir() {
            errors.push(format!(
                "Diretório da biblioteca não existe: {}",
                self.library.search_dir
            ));
        }

        errors
    }
}
