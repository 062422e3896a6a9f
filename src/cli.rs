use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use plantcare::schedule::{parse_frequency, parse_timestamp};
use plantcare::Timestamp;

#[derive(Parser)]
#[command(name = "plantcare")]
#[command(about = "Una CLI para llevar el riego de mis plantas")]
pub struct Cli {
    /// Archivo JSON de datos (sobrescribe PLANTCARE_DATA_FILE)
    #[arg(long = "data-file", global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ver plantas, primero las que necesitan agua
    List {
        /// Solo ID y nombre
        #[arg(long = "ids")]
        ids: bool,
    },
    /// Ver detalle y cuidados de una planta
    Show {
        /// ID de la planta
        #[arg(long)]
        id: String,
    },
    /// Agregar nueva planta
    Add(AddArgs),
    /// Actualizar planta existente
    Update(UpdateArgs),
    /// Regar ahora
    Water {
        /// ID de la planta a regar
        #[arg(long)]
        id: String,
    },
    /// Remover planta
    Remove {
        /// ID de la planta a remover
        #[arg(long)]
        id: String,
    },
    /// Recordatorios de riego de hoy
    Reminders,
    /// Guía de cuidados por nombre científico
    Guide {
        #[arg(long = "scientific-name")]
        scientific_name: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Nombre de la planta
    #[arg(short = 'n', long = "name")]
    pub name: String,
    /// Especie (nombre común)
    #[arg(short = 's', long = "species")]
    pub species: String,
    /// Nombre científico, para la guía de cuidados
    #[arg(long = "scientific-name")]
    pub scientific_name: Option<String>,
    /// Cada cuántos días se riega
    #[arg(short = 'f', long = "frequency", default_value = "7", value_parser = frequency_arg)]
    pub frequency: u32,
    /// Último riego (AAAA-MM-DD o RFC 3339); por defecto, ahora
    #[arg(long = "last-watered", value_parser = timestamp_arg)]
    pub last_watered: Option<Timestamp>,
    /// Notas iniciales
    #[arg(long)]
    pub notes: Option<String>,
    /// Referencia a una imagen ya subida
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// ID de la planta a actualizar
    #[arg(long)]
    pub id: String,
    /// Nuevo nombre (opcional)
    #[arg(short, long)]
    pub name: Option<String>,
    /// Nueva especie (opcional)
    #[arg(short, long)]
    pub species: Option<String>,
    /// Nuevo nombre científico ("" para quitarlo)
    #[arg(long = "scientific-name")]
    pub scientific_name: Option<String>,
    /// Nueva frecuencia de riego en días
    #[arg(short = 'f', long = "frequency", value_parser = frequency_arg)]
    pub frequency: Option<u32>,
    /// Corregir la fecha del último riego
    #[arg(long = "last-watered", value_parser = timestamp_arg)]
    pub last_watered: Option<Timestamp>,
    /// Nuevas notas ("" para quitarlas)
    #[arg(long)]
    pub notes: Option<String>,
    /// Nueva referencia de imagen ("" para quitarla)
    #[arg(long)]
    pub image: Option<String>,
}

fn frequency_arg(raw: &str) -> Result<u32, String> {
    parse_frequency(raw).map_err(|e| e.to_string())
}

fn timestamp_arg(raw: &str) -> Result<Timestamp, String> {
    parse_timestamp(raw, &Local)
        .map(|dt| dt.fixed_offset())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_frequency_and_date() {
        let cli = Cli::try_parse_from([
            "plantcare", "add", "-n", "Monty", "-s", "Monstera", "-f", "5", "--last-watered", "2024-01-28",
        ])
        .unwrap();
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.frequency, 5);
        assert!(args.last_watered.is_some());
        assert_eq!(args.scientific_name, None);
    }

    #[test]
    fn add_defaults_to_weekly_watering() {
        let cli = Cli::try_parse_from(["plantcare", "add", "-n", "Monty", "-s", "Monstera"]).unwrap();
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.frequency, 7);
        assert_eq!(args.last_watered, None);
    }

    #[test]
    fn invalid_frequency_and_date_are_rejected() {
        for bad in ["0", "-1", "2.5"] {
            let result = Cli::try_parse_from(["plantcare", "add", "-n", "A", "-s", "B", "-f", bad]);
            assert!(result.is_err(), "{bad}");
        }
        let result = Cli::try_parse_from(["plantcare", "add", "-n", "A", "-s", "B", "--last-watered", "ayer"]);
        assert!(result.is_err());
    }

    #[test]
    fn data_file_is_global() {
        let cli = Cli::try_parse_from(["plantcare", "list", "--data-file", "/tmp/p.json"]).unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/p.json")));
    }
}
