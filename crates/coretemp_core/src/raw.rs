//! Layout binário da `CORE_TEMP_SHARED_DATA_EX` (versão 2 da struct).
//!
//! Espelho exato do header do SDK do Core Temp:
//! <https://www.alcpu.com/CoreTemp/developers.html>
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────┐
//! │ Estrutura original (v1)      │ Extensão (v2)                    │
//! │ load/tjmax/counts/temps/name │ tdp/power/multipliers + version  │
//! └──────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! Os arrays sempre têm a capacidade máxima da ABI, independente do hardware
//! presente. Só o normalizador ([`crate::normalize`]) converte isso para o
//! registro público.

/// Capacidade dos arrays por core (load, temperatura, multiplicadores).
pub const MAX_CORES: usize = 256;

/// Capacidade dos arrays por CPU/pacote (TjMax, TDP, potência).
pub const MAX_CPUS: usize = 128;

/// Tamanho do buffer do nome da CPU.
pub const CPU_NAME_LEN: usize = 100;

/// Versão da struct que este layout descreve.
pub const STRUCT_VERSION: u32 = 2;

// ──────────────────────────────────────────────
// Structure (repr(C) – layout compatível com a DLL)
// ──────────────────────────────────────────────

/// Buffer de decodificação preenchido por `fnGetCoreTempInfoAlt`.
///
/// Vive apenas durante uma chamada: é criado zerado pelo invoker e
/// descartado logo após a normalização.
#[repr(C)]
#[derive(Clone)]
pub struct RawTelemetryBlock {
    // Estrutura original (CORE_TEMP_SHARED_DATA)
    pub ui_load: [u32; MAX_CORES],
    pub ui_tj_max: [u32; MAX_CPUS],
    pub ui_core_cnt: u32,
    pub ui_cpu_cnt: u32,
    pub f_temp: [f32; MAX_CORES],
    pub f_vid: f32,
    pub f_cpu_speed: f32,
    pub f_fsb_speed: f32,
    pub f_multiplier: f32,
    pub s_cpu_name: [u8; CPU_NAME_LEN],
    /// Temperaturas em Fahrenheit quando != 0
    pub uc_fahrenheit: u8,
    /// Temperaturas representam a distância até o TjMax quando != 0
    pub uc_delta_to_tj_max: u8,

    // Extensão (ui_struct_version = 2)
    /// `ui_tdp` válido quando != 0
    pub uc_tdp_supported: u8,
    /// `f_power` válido quando != 0
    pub uc_power_supported: u8,
    pub ui_struct_version: u32,
    pub ui_tdp: [u32; MAX_CPUS],
    pub f_power: [f32; MAX_CPUS],
    pub f_multipliers: [f32; MAX_CORES],
}

// 1024 + 512 + 8 + 1024 + 16 + 100 + 4 + 4 + 512 + 512 + 1024
const _: () = assert!(
    std::mem::size_of::<RawTelemetryBlock>() == 4740,
    "RawTelemetryBlock size mismatch - expected 4740 bytes"
);

impl RawTelemetryBlock {
    /// Bloco totalmente zerado, pronto para ser passado à DLL.
    pub fn zeroed() -> Self {
        Self {
            ui_load: [0; MAX_CORES],
            ui_tj_max: [0; MAX_CPUS],
            ui_core_cnt: 0,
            ui_cpu_cnt: 0,
            f_temp: [0.0; MAX_CORES],
            f_vid: 0.0,
            f_cpu_speed: 0.0,
            f_fsb_speed: 0.0,
            f_multiplier: 0.0,
            s_cpu_name: [0; CPU_NAME_LEN],
            uc_fahrenheit: 0,
            uc_delta_to_tj_max: 0,
            uc_tdp_supported: 0,
            uc_power_supported: 0,
            ui_struct_version: 0,
            ui_tdp: [0; MAX_CPUS],
            f_power: [0.0; MAX_CPUS],
            f_multipliers: [0.0; MAX_CORES],
        }
    }

    /// Copia `name` para o buffer do nome, truncando e preenchendo com NUL.
    pub fn set_cpu_name(&mut self, name: &str) {
        self.s_cpu_name = [0; CPU_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(CPU_NAME_LEN);
        self.s_cpu_name[..len].copy_from_slice(&bytes[..len]);
    }
}

impl Default for RawTelemetryBlock {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl std::fmt::Debug for RawTelemetryBlock {
    // Os arrays completos (4.7 KB) poluem o log; mostra só os metadados.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawTelemetryBlock")
            .field("ui_core_cnt", &self.ui_core_cnt)
            .field("ui_cpu_cnt", &self.ui_cpu_cnt)
            .field("ui_struct_version", &self.ui_struct_version)
            .field("uc_fahrenheit", &self.uc_fahrenheit)
            .field("uc_delta_to_tj_max", &self.uc_delta_to_tj_max)
            .field("uc_tdp_supported", &self.uc_tdp_supported)
            .field("uc_power_supported", &self.uc_power_supported)
            .finish_non_exhaustive()
    }
}
