//! Chamada única a `fnGetCoreTempInfoAlt`.

use crate::error::CoreTempError;
use crate::raw::RawTelemetryBlock;
use crate::resolver::GetCoreTempInfoFn;

/// Status que o SDK retorna em caso de sucesso.
pub const STATUS_OK: u8 = 1;

/// Aloca um bloco zerado, chama `func` com seu endereço e devolve o bloco
/// preenchido.
///
/// Qualquer status diferente de [`STATUS_OK`] vira
/// [`CoreTempError::Invocation`] com o último erro do SO, quando houver.
/// A chamada é bloqueante e não tem timeout.
pub fn invoke(func: GetCoreTempInfoFn, symbol: &str) -> Result<RawTelemetryBlock, CoreTempError> {
    let mut raw = Box::new(RawTelemetryBlock::zeroed());

    // SAFETY: `raw` é um buffer válido, alinhado e do tamanho exato da
    // CORE_TEMP_SHARED_DATA_EX; a DLL só escreve dentro dele.
    let status = unsafe { func(&mut *raw) };

    if status != STATUS_OK {
        return Err(CoreTempError::Invocation {
            symbol: symbol.to_string(),
            status,
            source: last_os_error(),
        });
    }

    Ok(*raw)
}

/// Último erro do SO (`GetLastError`), ignorando o código 0.
///
/// Fora do Windows o `errno` não é zerado antes da chamada e pode ser de
/// outra operação, então não é repassado.
fn last_os_error() -> Option<std::io::Error> {
    if !cfg!(windows) {
        return None;
    }
    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(0) | None => None,
        Some(_) => Some(err),
    }
}
