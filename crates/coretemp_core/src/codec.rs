//! Serialização do [`TelemetryRecord`].
//!
//! JSON e YAML usam os mesmos nomes de campo, na ordem de declaração.
//! O formato binário é um snapshot em bincode, selado com tag e comprimento
//! para que arquivos truncados ou concatenados sejam recusados:
//!
//! ```text
//! ┌────────────┬────────────────┬──────────────┐
//! │ "CTS1" (4) │ len u32 LE (4) │ bincode (N)  │
//! └────────────┴────────────────┴──────────────┘
//! ```

use crate::types::TelemetryRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tag dos snapshots binários; o último byte é a versão do layout.
pub const SNAPSHOT_TAG: [u8; 4] = *b"CTS1";

const LEN_SIZE: usize = 4;

/// Formatos de saída suportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
    Binary,
}

impl Format {
    /// `true` para formatos legíveis no terminal.
    pub fn is_text(self) -> bool {
        !matches!(self, Format::Binary)
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "binary" | "bin" => Ok(Format::Binary),
            other => Err(CodecError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Binary => "binary",
        })
    }
}

/// Erros do codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Formato desconhecido: '{0}' (use json, yaml ou binary)")]
    UnknownFormat(String),

    #[error("Snapshot inválido: {0}")]
    InvalidSnapshot(&'static str),

    #[error("Erro de serialização {format}: {detail}")]
    Serialize { format: Format, detail: String },

    #[error("Erro de deserialização {format}: {detail}")]
    Deserialize { format: Format, detail: String },
}

/// Serializa o registro no formato pedido.
///
/// `pretty` só afeta JSON (YAML já é multi-linha).
pub fn encode(record: &TelemetryRecord, format: Format, pretty: bool) -> Result<Vec<u8>, CodecError> {
    let ser = |detail: String| CodecError::Serialize { format, detail };

    match format {
        Format::Json if pretty => serde_json::to_vec_pretty(record).map_err(|e| ser(e.to_string())),
        Format::Json => serde_json::to_vec(record).map_err(|e| ser(e.to_string())),
        Format::Yaml => serde_yaml::to_string(record)
            .map(String::into_bytes)
            .map_err(|e| ser(e.to_string())),
        Format::Binary => {
            let body = bincode::serialize(record).map_err(|e| ser(e.to_string()))?;
            let len = u32::try_from(body.len()).map_err(|_| ser("snapshot maior que 4 GiB".into()))?;
            Ok(seal_snapshot(len, body))
        }
    }
}

/// Lê um registro serializado por [`encode`].
pub fn decode(data: &[u8], format: Format) -> Result<TelemetryRecord, CodecError> {
    let de = |detail: String| CodecError::Deserialize { format, detail };

    match format {
        Format::Json => serde_json::from_slice(data).map_err(|e| de(e.to_string())),
        Format::Yaml => serde_yaml::from_slice(data).map_err(|e| de(e.to_string())),
        Format::Binary => {
            let body = open_snapshot(data)?;
            bincode::deserialize(body).map_err(|e| de(e.to_string()))
        }
    }
}

fn seal_snapshot(len: u32, body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(SNAPSHOT_TAG.len() + LEN_SIZE + body.len());
    out.extend_from_slice(&SNAPSHOT_TAG);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend(body);
    out
}

/// Confere tag e comprimento e devolve só o corpo bincode.
fn open_snapshot(data: &[u8]) -> Result<&[u8], CodecError> {
    let rest = data
        .strip_prefix(&SNAPSHOT_TAG[..])
        .ok_or(CodecError::InvalidSnapshot("tag CTS1 ausente"))?;
    let (len, body) = rest
        .split_first_chunk::<LEN_SIZE>()
        .ok_or(CodecError::InvalidSnapshot("comprimento ausente"))?;
    if u32::from_le_bytes(*len) as usize != body.len() {
        return Err(CodecError::InvalidSnapshot("comprimento não confere com o corpo"));
    }
    Ok(body)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_JSON: &str = include_str!("../testdata/example.json");
    const EXAMPLE_YAML: &str = include_str!("../testdata/example.yaml");

    const FIELDS: [&str; 11] = [
        "load",
        "tj_max",
        "core_count",
        "temperature",
        "vid",
        "cpu_speed",
        "fsb_speed",
        "multiplier",
        "cpu_name",
        "fahrenheit",
        "delta_to_tj_max",
    ];

    fn sample_record() -> TelemetryRecord {
        TelemetryRecord {
            load: vec![12, 7, 99, 0],
            tj_max: vec![100],
            core_count: 4,
            temperature: vec![45.5, 47.0, 52.25, 44.0],
            vid: 1.1875,
            cpu_speed: 4298.5,
            fsb_speed: 99.75,
            multiplier: 43.0,
            cpu_name: "Intel Core i7-8700K".into(),
            fahrenheit: false,
            delta_to_tj_max: true,
        }
    }

    #[test]
    fn text_formats_roundtrip() {
        let original = sample_record();
        for format in [Format::Json, Format::Yaml] {
            for pretty in [true, false] {
                let bytes = encode(&original, format, pretty).unwrap();
                let decoded = decode(&bytes, format).unwrap();
                assert_eq!(original, decoded, "{format} pretty={pretty}");
            }
        }
    }

    #[test]
    fn binary_roundtrip_and_header() {
        let original = sample_record();
        let snapshot = encode(&original, Format::Binary, false).unwrap();
        assert_eq!(&snapshot[..4], b"CTS1");
        let len = u32::from_le_bytes(snapshot[4..8].try_into().unwrap()) as usize;
        assert_eq!(len, snapshot.len() - 8);
        assert_eq!(decode(&snapshot, Format::Binary).unwrap(), original);
    }

    #[test]
    fn binary_rejects_damaged_snapshots() {
        let snapshot = encode(&sample_record(), Format::Binary, false).unwrap();
        let rejects = |data: &[u8]| {
            matches!(
                decode(data, Format::Binary),
                Err(CodecError::InvalidSnapshot(_))
            )
        };

        assert!(rejects(&snapshot[..3]));
        assert!(rejects(&snapshot[..6]));
        // Truncado no corpo
        assert!(rejects(&snapshot[..snapshot.len() - 1]));

        let mut concatenated = snapshot.clone();
        concatenated.extend_from_slice(&snapshot);
        assert!(rejects(&concatenated[..]));

        let mut other_version = snapshot.clone();
        other_version[3] = b'2';
        assert!(rejects(&other_version[..]));
    }

    #[test]
    fn field_names_match_across_formats() {
        let record = sample_record();
        let json = String::from_utf8(encode(&record, Format::Json, true).unwrap()).unwrap();
        let yaml = String::from_utf8(encode(&record, Format::Yaml, false).unwrap()).unwrap();
        for field in FIELDS {
            assert!(json.contains(&format!("\"{field}\":")), "json sem {field}");
            assert!(yaml.contains(&format!("{field}:")), "yaml sem {field}");
        }
    }

    #[test]
    fn json_keys_follow_declaration_order() {
        let json = String::from_utf8(encode(&sample_record(), Format::Json, false).unwrap()).unwrap();
        let positions: Vec<usize> = FIELDS
            .iter()
            .map(|f| json.find(&format!("\"{f}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn parses_json_fixture() {
        let record = decode(EXAMPLE_JSON.as_bytes(), Format::Json).unwrap();
        assert_eq!(record.load, vec![0, 1, 2, 3]);
        assert_eq!(record.core_count, 4);
        assert_eq!(record.cpu_name, "Intel(R) Core(TM) i5-4670K CPU @ 3.40GHz");

        let again = encode(&record, Format::Json, true).unwrap();
        assert_eq!(decode(&again, Format::Json).unwrap(), record);
    }

    #[test]
    fn json_output_matches_fixture_bytes() {
        let record = decode(EXAMPLE_JSON.as_bytes(), Format::Json).unwrap();
        let json = String::from_utf8(encode(&record, Format::Json, true).unwrap()).unwrap();
        // O arquivo termina com '\n'; serde_json não emite newline final
        assert_eq!(json, EXAMPLE_JSON.trim_end());
    }

    #[test]
    fn yaml_output_matches_fixture_bytes() {
        let record = decode(EXAMPLE_YAML.as_bytes(), Format::Yaml).unwrap();
        let yaml = String::from_utf8(encode(&record, Format::Yaml, true).unwrap()).unwrap();
        assert_eq!(yaml, EXAMPLE_YAML);
    }

    #[test]
    fn parses_yaml_fixture() {
        let record = decode(EXAMPLE_YAML.as_bytes(), Format::Yaml).unwrap();
        assert_eq!(record.load, vec![0, 1, 2, 3]);
        assert_eq!(record.tj_max, vec![100]);

        let json = decode(EXAMPLE_JSON.as_bytes(), Format::Json).unwrap();
        assert_eq!(record, json);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!(" YML ".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("bin".parse::<Format>().unwrap(), Format::Binary);
        assert!(matches!(
            "xml".parse::<Format>(),
            Err(CodecError::UnknownFormat(f)) if f == "xml"
        ));
        assert!(!Format::Binary.is_text());
    }
}
