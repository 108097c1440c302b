//! # Core Temp Core
//!
//! Leitura da telemetria da CPU exposta pelo Core Temp através da
//! `GetCoreTempInfo.dll` (memória compartilhada do daemon).
//!
//! O Core Temp precisa estar rodando; a DLL só copia o último snapshot.
//!
//! ## Módulos
//! - [`raw`] – Layout `repr(C)` da struct do SDK
//! - [`resolver`] – Carregamento preguiçoso da DLL e do símbolo
//! - [`invoke`] – Chamada única à função exportada
//! - [`normalize`] – Buffer fixo → registro público
//! - [`types`] – [`TelemetryRecord`]
//! - [`codec`] – JSON / YAML / snapshot binário
//! - [`config`] – Configuração via TOML
//!
//! ## Uso
//! ```no_run
//! use coretemp_core::CoreTemp;
//!
//! let coretemp = CoreTemp::new();
//! match coretemp.fetch() {
//!     Ok(info) => println!("{}: {:?}", info.cpu_name, info.temperature_celsius()),
//!     Err(e) => eprintln!("ERRO: {e}"),
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod invoke;
pub mod normalize;
pub mod raw;
pub mod resolver;
pub mod types;

// Re-exports convenientes
pub use codec::{CodecError, Format, decode, encode};
pub use config::AppConfig;
pub use error::CoreTempError;
pub use resolver::SymbolResolver;
pub use types::TelemetryRecord;

use tracing::debug;

/// Cliente do Core Temp. Crie um e reutilize: a DLL é carregada uma vez.
///
/// `Sync`: várias threads podem chamar [`CoreTemp::fetch`] ao mesmo tempo.
pub struct CoreTemp {
    resolver: SymbolResolver,
}

impl Default for CoreTemp {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreTemp {
    /// Usa `GetCoreTempInfo.dll` / `fnGetCoreTempInfoAlt` do caminho de busca.
    pub fn new() -> Self {
        Self::from_config(&config::LibraryConfig::default())
    }

    pub fn from_config(cfg: &config::LibraryConfig) -> Self {
        Self::with_resolver(SymbolResolver::from_config(cfg))
    }

    pub fn with_resolver(resolver: SymbolResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    /// Lê a telemetria atual.
    ///
    /// Erros saem sem retry: [`CoreTempError::Resolution`] se a DLL ou o
    /// símbolo não forem encontrados, [`CoreTempError::Invocation`] se a
    /// chamada falhar. Nunca retorna registro parcial.
    pub fn fetch(&self) -> Result<TelemetryRecord, CoreTempError> {
        let handle = self.resolver.resolve()?;
        let raw = invoke::invoke(handle.func(), self.resolver.symbol_name())?;

        debug!(
            struct_version = raw.ui_struct_version,
            tdp_supported = normalize::flag(raw.uc_tdp_supported),
            power_supported = normalize::flag(raw.uc_power_supported),
            cores = raw.ui_core_cnt,
            cpus = raw.ui_cpu_cnt,
            "Core Temp: bloco recebido"
        );
        if raw.ui_struct_version != 0 && raw.ui_struct_version < raw::STRUCT_VERSION {
            debug!(
                "Struct v{} (< v{}): campos estendidos não são válidos",
                raw.ui_struct_version,
                raw::STRUCT_VERSION
            );
        }

        Ok(normalize::normalize(&raw))
    }
}

/// Atalho para [`CoreTemp::fetch`].
pub fn fetch_telemetry(coretemp: &CoreTemp) -> Result<TelemetryRecord, CoreTempError> {
    coretemp.fetch()
}
