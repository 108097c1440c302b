//! # Core Temp CLI
//!
//! Lê a telemetria da CPU via `GetCoreTempInfo.dll` uma única vez e imprime
//! o registro. O Core Temp precisa estar rodando.
//!
//! ## Uso
//! ```bash
//! coretemp.exe                                   # JSON no stdout
//! coretemp.exe --format yaml
//! coretemp.exe --format binary --output cpu.bin  # snapshot bincode
//! ```

use clap::Parser;
use coretemp_core::{AppConfig, CodecError, CoreTemp, Format, TelemetryRecord, encode};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "coretemp", version, about = "Lê a telemetria da CPU exposta pelo Core Temp")]
struct Cli {
    /// Arquivo de configuração (padrão: coretemp.toml ao lado do executável)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Formato de saída: json, yaml ou binary
    #[arg(short, long)]
    format: Option<Format>,

    /// Grava no arquivo em vez do stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON em uma linha
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    // ── Logging (stderr; stdout é só dado) ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Carregar config ──
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path);

    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    let format = cli.format.unwrap_or(config.output.format);
    let pretty = config.output.pretty && !cli.compact;

    if !format.is_text() && cli.output.is_none() {
        error!("Formato {format} exige --output <arquivo>");
        return ExitCode::FAILURE;
    }

    // ── Leitura ──
    let coretemp = CoreTemp::from_config(&config.library);
    let info = match coretemp.fetch() {
        Ok(info) => info,
        Err(e) => {
            error!("ERRO: {e}");
            return ExitCode::FAILURE;
        }
    };

    log_summary(&info);

    match write_record(&info, format, pretty, cli.output.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Falhas ao entregar o registro.
#[derive(Debug, thiserror::Error)]
enum OutputError {
    #[error(transparent)]
    Encode(#[from] CodecError),

    #[error("Erro ao gravar {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    #[error("Erro ao escrever no stdout: {0}")]
    Stdout(std::io::Error),
}

fn log_summary(info: &TelemetryRecord) {
    info!("CPU: {}", info.cpu_name);
    info!(
        "{} cores | {:.0} MHz | {:.3} V | Temperaturas (°C): {:?}",
        info.core_count,
        info.cpu_speed,
        info.vid,
        info.temperature_celsius()
    );
    if info.delta_to_tj_max {
        info!("Temperaturas reportadas como distância até o TjMax {:?}", info.tj_max);
    }
}

fn write_record(
    info: &TelemetryRecord,
    format: Format,
    pretty: bool,
    output: Option<&PathBuf>,
) -> Result<(), OutputError> {
    let mut bytes = encode(info, format, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(path, &bytes).map_err(|source| OutputError::File {
                path: path.display().to_string(),
                source,
            })?;
            info!("{} bytes ({format}) gravados em {}", bytes.len(), path.display());
        }
        None => {
            if !bytes.ends_with(b"\n") {
                bytes.push(b'\n');
            }
            std::io::stdout()
                .lock()
                .write_all(&bytes)
                .map_err(OutputError::Stdout)?;
        }
    }
    Ok(())
}
