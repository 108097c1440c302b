//! Erros da leitura de telemetria.
//!
//! A mensagem de [`CoreTempError::Resolution`] já vem montada para o usuário
//! final: nome do arquivo, diretório, versão mínima e URL de download.

use std::path::PathBuf;

/// Versão mínima da `GetCoreTempInfo.dll` com a struct v2.
pub const MIN_LIBRARY_VERSION: &str = "1.2.0.0";

/// Página do SDK onde a DLL pode ser baixada.
pub const LIBRARY_HELP_URL: &str = "https://www.alcpu.com/CoreTemp/developers.html";

/// Falhas de [`crate::CoreTemp::fetch`], por etapa.
#[derive(Debug, thiserror::Error)]
pub enum CoreTempError {
    /// Biblioteca ou símbolo não encontrado (ou versão incompatível).
    #[error(
        "Certifique-se de que '{library}' está no diretório '{}' e que a versão é no mínimo {}. \
         A DLL pode ser baixada em '{}'. Erro: {source}",
        .directory.display(),
        MIN_LIBRARY_VERSION,
        LIBRARY_HELP_URL
    )]
    Resolution {
        library: String,
        directory: PathBuf,
        source: libloading::Error,
    },

    /// `fnGetCoreTempInfoAlt` retornou status diferente de 1.
    #[error("{symbol} falhou (status {status}){}", os_error_suffix(.source))]
    Invocation {
        symbol: String,
        status: u8,
        source: Option<std::io::Error>,
    },
}

impl CoreTempError {
    /// `true` quando a falha aconteceu ao carregar a biblioteca.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }
}

fn os_error_suffix(source: &Option<std::io::Error>) -> String {
    match source {
        Some(e) => format!(": {e}"),
        None => String::new(),
    }
}

/// Diretório mostrado na mensagem de erro (cwd, ou "." se indisponível).
pub(crate) fn current_dir_or_dot() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
