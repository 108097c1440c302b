//! Normalização `RawTelemetryBlock` → `TelemetryRecord`.
//!
//! Única ponte entre o buffer de capacidade fixa da ABI e o registro público.
//! Função pura: não aloca nada além do próprio registro.

use crate::raw::{MAX_CORES, MAX_CPUS, RawTelemetryBlock};
use crate::types::TelemetryRecord;
use tracing::warn;

/// Converte o bloco preenchido pela DLL no registro público.
///
/// - `load`/`temperature` truncados para `ui_core_cnt`
/// - `tj_max` truncado para `ui_cpu_cnt`
/// - contagens acima da capacidade da ABI são limitadas à capacidade
pub fn normalize(raw: &RawTelemetryBlock) -> TelemetryRecord {
    let cores = live_count(raw.ui_core_cnt, MAX_CORES, "ui_core_cnt");
    let cpus = live_count(raw.ui_cpu_cnt, MAX_CPUS, "ui_cpu_cnt");

    TelemetryRecord {
        load: raw.ui_load[..cores].to_vec(),
        tj_max: raw.ui_tj_max[..cpus].to_vec(),
        core_count: cores as u32,
        temperature: raw.f_temp[..cores].to_vec(),
        vid: raw.f_vid,
        cpu_speed: raw.f_cpu_speed,
        fsb_speed: raw.f_fsb_speed,
        multiplier: raw.f_multiplier,
        cpu_name: decode_cpu_name(&raw.s_cpu_name),
        fahrenheit: flag(raw.uc_fahrenheit),
        delta_to_tj_max: flag(raw.uc_delta_to_tj_max),
    }
}

impl From<&RawTelemetryBlock> for TelemetryRecord {
    fn from(raw: &RawTelemetryBlock) -> Self {
        normalize(raw)
    }
}

fn live_count(reported: u32, capacity: usize, field: &str) -> usize {
    let reported = reported as usize;
    if reported > capacity {
        warn!("{field} = {reported} excede a capacidade da ABI ({capacity}); limitando");
        capacity
    } else {
        reported
    }
}

/// Byte de flag da ABI → `bool` (qualquer valor != 0 é verdadeiro).
pub fn flag(byte: u8) -> bool {
    byte != 0
}

/// Decodifica o buffer `s_cpu_name` (bytes inválidos viram U+FFFD).
pub fn decode_cpu_name(buf: &[u8]) -> String {
    clean_name(&String::from_utf8_lossy(buf))
}

/// Remove NULs das pontas e depois espaços em volta.
pub fn clean_name(name: &str) -> String {
    name.trim_matches('\0').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::CPU_NAME_LEN;

    fn sample_raw() -> RawTelemetryBlock {
        let mut raw = RawTelemetryBlock::zeroed();
        raw.ui_core_cnt = 4;
        raw.ui_cpu_cnt = 1;
        raw.ui_load[..4].copy_from_slice(&[10, 20, 30, 40]);
        raw.ui_tj_max[0] = 100;
        raw.f_temp[..4].copy_from_slice(&[41.0, 42.5, 39.0, 44.0]);
        raw.f_vid = 1.25;
        raw.f_cpu_speed = 3700.0;
        raw.f_fsb_speed = 100.0;
        raw.f_multiplier = 37.0;
        raw.set_cpu_name("  Intel Core i7-8700K ");
        raw.uc_fahrenheit = 0;
        raw.uc_delta_to_tj_max = 1;
        raw.ui_struct_version = 2;
        raw
    }

    #[test]
    fn truncates_to_core_count() {
        let rec = normalize(&sample_raw());
        assert_eq!(rec.load, vec![10, 20, 30, 40]);
        assert_eq!(rec.temperature, vec![41.0, 42.5, 39.0, 44.0]);
        assert_eq!(rec.core_count, 4);
    }

    #[test]
    fn lengths_follow_reported_counts() {
        let mut raw = sample_raw();
        for k in [0u32, 1, 7, 64, 256] {
            raw.ui_core_cnt = k;
            let rec = normalize(&raw);
            assert_eq!(rec.load.len(), k as usize);
            assert_eq!(rec.temperature.len(), k as usize);
        }
        for m in [0u32, 2, 128] {
            raw.ui_cpu_cnt = m;
            assert_eq!(normalize(&raw).tj_max.len(), m as usize);
        }
    }

    #[test]
    fn counts_above_capacity_are_clamped() {
        let mut raw = sample_raw();
        raw.ui_core_cnt = 1000;
        raw.ui_cpu_cnt = u32::MAX;
        let rec = normalize(&raw);
        assert_eq!(rec.load.len(), MAX_CORES);
        assert_eq!(rec.core_count, MAX_CORES as u32);
        assert_eq!(rec.tj_max.len(), MAX_CPUS);
    }

    #[test]
    fn scalars_and_flags() {
        let rec = TelemetryRecord::from(&sample_raw());
        assert_eq!(rec.tj_max, vec![100]);
        assert_eq!(rec.vid, 1.25);
        assert_eq!(rec.cpu_speed, 3700.0);
        assert_eq!(rec.fsb_speed, 100.0);
        assert_eq!(rec.multiplier, 37.0);
        assert_eq!(rec.cpu_name, "Intel Core i7-8700K");
        assert!(!rec.fahrenheit);
        assert!(rec.delta_to_tj_max);
    }

    #[test]
    fn flag_is_nonzero_test() {
        assert!(!flag(0));
        assert!(flag(1));
        assert!(flag(255));
    }

    #[test]
    fn name_padding_is_stripped() {
        let mut buf = [0u8; CPU_NAME_LEN];
        buf[..10].copy_from_slice(b"Intel Core");
        assert_eq!(decode_cpu_name(&buf), "Intel Core");
        assert_eq!(clean_name("Intel Core\0\0\0\0"), "Intel Core");
    }

    #[test]
    fn clean_name_is_idempotent() {
        for name in ["Intel Core", "  AMD Ryzen 9 7950X\t", "\0\0", ""] {
            let once = clean_name(name);
            assert_eq!(clean_name(&once), once);
        }
    }

    #[test]
    fn all_nul_name_is_empty() {
        assert_eq!(decode_cpu_name(&[0u8; CPU_NAME_LEN]), "");
    }
}
