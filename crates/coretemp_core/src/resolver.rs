//! Resolução preguiçosa de `fnGetCoreTempInfoAlt`.
//!
//! A biblioteca só é aberta na primeira leitura. O handle resolvido fica em
//! cache dentro do [`SymbolResolver`] (não há estado global): o `Mutex` cobre
//! apenas a resolução, a chamada em si roda fora dele via `Arc`.
//!
//! Se a resolução falhar, nada é guardado e a próxima chamada tenta de novo
//! (ex.: a DLL foi copiada para o diretório depois de o processo subir).

use crate::config::LibraryConfig;
use crate::error::{CoreTempError, current_dir_or_dot};
use crate::raw::RawTelemetryBlock;
use libloading::{Library, Symbol};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Assinatura de `fnGetCoreTempInfoAlt` (WINAPI, retorna `bool` de C++).
pub type GetCoreTempInfoFn = unsafe extern "system" fn(*mut RawTelemetryBlock) -> u8;

/// Nome exportado pela `GetCoreTempInfo.dll`.
pub const DEFAULT_SYMBOL: &str = "fnGetCoreTempInfoAlt";

/// Nome base da biblioteca (sem prefixo/extensão de plataforma).
pub const LIBRARY_STEM: &str = "GetCoreTempInfo";

/// Nome do arquivo da biblioteca na plataforma atual
/// (`GetCoreTempInfo.dll` no Windows).
pub fn default_library_name() -> String {
    libloading::library_filename(LIBRARY_STEM)
        .to_string_lossy()
        .into_owned()
}

/// Handle pronto para chamar.
pub struct ResolvedSymbol {
    func: GetCoreTempInfoFn,
    // Mantém a biblioteca carregada enquanto `func` estiver em uso.
    _library: Option<Library>,
}

impl ResolvedSymbol {
    pub fn func(&self) -> GetCoreTempInfoFn {
        self.func
    }
}

enum Source {
    Library {
        name: String,
        symbol: String,
        search_dir: Option<PathBuf>,
    },
    Static(GetCoreTempInfoFn),
}

/// Localiza e mantém em cache o símbolo da DLL do Core Temp.
pub struct SymbolResolver {
    source: Source,
    cached: Mutex<Option<Arc<ResolvedSymbol>>>,
}

impl SymbolResolver {
    /// Resolver para `library`/`symbol` no caminho de busca do sistema.
    pub fn new(library: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::with_source(Source::Library {
            name: library.into(),
            symbol: symbol.into(),
            search_dir: None,
        })
    }

    /// Resolver a partir da seção `[library]` do config.
    pub fn from_config(cfg: &LibraryConfig) -> Self {
        let search_dir = if cfg.search_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&cfg.search_dir))
        };
        Self::with_source(Source::Library {
            name: cfg.name.clone(),
            symbol: cfg.symbol.clone(),
            search_dir,
        })
    }

    /// Resolver que já nasce com uma função resolvida (sem biblioteca).
    ///
    /// Útil para embutir uma implementação própria do SDK ou para testes.
    pub fn from_fn(func: GetCoreTempInfoFn) -> Self {
        Self::with_source(Source::Static(func))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// Nome do símbolo chamado (usado nas mensagens de erro).
    pub fn symbol_name(&self) -> &str {
        match &self.source {
            Source::Library { symbol, .. } => symbol,
            Source::Static(_) => DEFAULT_SYMBOL,
        }
    }

    /// `true` se já existe um handle em cache.
    pub fn is_resolved(&self) -> bool {
        lock(&self.cached).is_some()
    }

    /// Retorna o handle em cache ou resolve agora.
    pub fn resolve(&self) -> Result<Arc<ResolvedSymbol>, CoreTempError> {
        let mut cached = lock(&self.cached);
        if let Some(handle) = cached.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(self.load()?);
        *cached = Some(Arc::clone(&handle));
        Ok(handle)
    }

    fn load(&self) -> Result<ResolvedSymbol, CoreTempError> {
        let (name, symbol, search_dir) = match &self.source {
            Source::Static(func) => {
                return Ok(ResolvedSymbol {
                    func: *func,
                    _library: None,
                });
            }
            Source::Library {
                name,
                symbol,
                search_dir,
            } => (name, symbol, search_dir),
        };

        let path = match search_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };
        let resolution_error = |source| CoreTempError::Resolution {
            library: name.clone(),
            directory: search_dir.clone().unwrap_or_else(current_dir_or_dot),
            source,
        };

        debug!("Carregando {} ({symbol})", path.display());

        // SAFETY: carregar uma biblioteca executa seus inicializadores; a
        // GetCoreTempInfo.dll só mapeia a memória compartilhada do Core Temp.
        let library = unsafe { Library::new(&path) }.map_err(resolution_error)?;

        // SAFETY: o tipo de `GetCoreTempInfoFn` segue o header do SDK.
        let func = unsafe {
            let sym: Symbol<GetCoreTempInfoFn> =
                library.get(symbol.as_bytes()).map_err(resolution_error)?;
            *sym
        };

        info!("✓ {name}: {symbol} resolvido");
        Ok(ResolvedSymbol {
            func,
            _library: Some(library),
        })
    }
}

/// Obtém o lock mesmo que outra thread tenha dado panic com ele.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
