//! Registro público de telemetria da CPU.
//!
//! Sem arrays de capacidade fixa: todo `Vec` aqui tem exatamente o número de
//! elementos ativos informado pelo Core Temp.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Registro
// ──────────────────────────────────────────────

/// Leitura completa do Core Temp, pronta para JSON/YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TelemetryRecord {
    /// Carga por core (0–100%), `core_count` elementos
    pub load: Vec<u32>,
    /// TjMax por CPU física, um elemento por pacote
    pub tj_max: Vec<u32>,
    /// Número de cores ativos
    pub core_count: u32,
    /// Temperatura por core, na unidade indicada por `fahrenheit`
    pub temperature: Vec<f32>,
    /// Tensão do core (V)
    pub vid: f32,
    /// Clock da CPU (MHz)
    pub cpu_speed: f32,
    /// Clock do FSB (MHz)
    pub fsb_speed: f32,
    /// Multiplicador atual
    pub multiplier: f32,
    /// Nome da CPU (ex: "Intel Core i7-8700K")
    pub cpu_name: String,
    /// Temperaturas em Fahrenheit
    pub fahrenheit: bool,
    /// Temperaturas são a distância até o TjMax
    pub delta_to_tj_max: bool,
}

impl TelemetryRecord {
    /// Temperaturas por core em Celsius.
    pub fn temperature_celsius(&self) -> Vec<f32> {
        if self.fahrenheit {
            self.temperature.iter().map(|&t| fahrenheit_to_celsius(t)).collect()
        } else {
            self.temperature.clone()
        }
    }

    /// Temperaturas por core em Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> Vec<f32> {
        if self.fahrenheit {
            self.temperature.clone()
        } else {
            self.temperature.iter().map(|&t| celsius_to_fahrenheit(t)).collect()
        }
    }
}

pub fn fahrenheit_to_celsius(f: f32) -> f32 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * 9.0 / 5.0 + 32.0
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
