use std::fmt::{self, Write};

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use plantcare::care::{self, CareGuide};
use plantcare::db::PlantRepository;
use plantcare::notifications::{due_today, overdue};
use plantcare::schedule::sort_by_urgency;
use plantcare::{PlantDraft, PlantEdit, PlantError, PlantRecord, PlantStore, Timestamp, Urgency};

use crate::cli::{AddArgs, Commands, UpdateArgs};

pub async fn run<R: PlantRepository>(mut store: PlantStore<R>, command: Commands) -> Result<()> {
    let now = Local::now();

    match command {
        Commands::List { ids } => {
            let mut out = String::new();
            render_list(&mut out, store.list_all(), &now, ids)?;
            print!("{out}");
        }
        Commands::Show { id } => match store.get(&id) {
            Ok(plant) => {
                let mut out = String::new();
                render_details(&mut out, plant, &now)?;
                print!("{out}");
            }
            Err(PlantError::NotFound(_)) => println!("No se encontró planta con ID {}", id),
            Err(e) => return Err(e.into()),
        },
        Commands::Add(args) => {
            let plant = store.add(draft_from(args), now.fixed_offset()).await?;
            println!("Planta agregada, ID: {}", plant.id);
            println!("Próximo riego: {}", format_date(&plant.next_watering()));
        }
        Commands::Update(args) => {
            let id = args.id.clone();
            match store.update(&id, edit_from(args)).await {
                Ok(plant) => {
                    println!("Planta ID {} actualizada", plant.id);
                    println!("Próximo riego: {}", format_date(&plant.next_watering()));
                }
                Err(PlantError::NotFound(_)) => println!("No se encontró planta con ID {}", id),
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Water { id } => match store.water_now(&id, now.fixed_offset()).await {
            Ok(plant) => println!(
                "'{}' regada. Próximo riego: {}",
                plant.name,
                format_date(&plant.next_watering())
            ),
            Err(PlantError::NotFound(_)) => println!("No se encontró planta con ID {}", id),
            Err(e) => return Err(e.into()),
        },
        Commands::Remove { id } => match store.remove(&id).await {
            Ok(plant) => println!("Planta '{}' (ID {}) removida", plant.name, plant.id),
            Err(PlantError::NotFound(_)) => println!("No se encontró planta con ID {}", id),
            Err(e) => return Err(e.into()),
        },
        Commands::Reminders => {
            let mut out = String::new();
            render_reminders(&mut out, store.list_all(), &now)?;
            print!("{out}");
        }
        Commands::Guide { scientific_name } => {
            let mut out = String::new();
            render_guide(&mut out, scientific_name.as_deref())?;
            print!("{out}");
        }
    }

    Ok(())
}

fn draft_from(args: AddArgs) -> PlantDraft {
    PlantDraft {
        name: args.name,
        species: args.species,
        scientific_name: args.scientific_name,
        water_frequency_days: args.frequency,
        last_watered: args.last_watered,
        notes: args.notes,
        image_reference: args.image,
    }
}

fn edit_from(args: UpdateArgs) -> PlantEdit {
    PlantEdit {
        name: args.name,
        species: args.species,
        scientific_name: args.scientific_name,
        water_frequency_days: args.frequency,
        last_watered: args.last_watered,
        notes: args.notes,
        image_reference: args.image,
    }
}

fn format_date(ts: &Timestamp) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Overdue => "¡Necesita agua!",
        Urgency::DueToday => "¡Regar hoy!",
        Urgency::Scheduled => "Al día",
    }
}

pub fn render_list<W: Write, Tz: TimeZone>(
    out: &mut W,
    plants: &[PlantRecord],
    now: &DateTime<Tz>,
    ids_only: bool,
) -> fmt::Result {
    if plants.is_empty() {
        return writeln!(out, "No hay plantas todavía. Agrega la primera con `plantcare add`.");
    }
    for plant in sort_by_urgency(plants, now) {
        if ids_only {
            writeln!(out, "{}, '{}'", plant.id, plant.name)?;
            continue;
        }
        writeln!(
            out,
            "Nombre: '{}' ({})\nÚltimo riego: {}\nPróximo riego: {} [{}]\nID: '{}'\n",
            plant.name,
            plant.species,
            format_date(&plant.last_watered),
            format_date(&plant.next_watering()),
            urgency_label(plant.urgency(now)),
            plant.id,
        )?;
    }
    Ok(())
}

pub fn render_details<W: Write, Tz: TimeZone>(out: &mut W, plant: &PlantRecord, now: &DateTime<Tz>) -> fmt::Result {
    writeln!(out, "Nombre: '{}'", plant.name)?;
    writeln!(out, "Especie: '{}'", plant.species)?;
    if let Some(scientific) = &plant.scientific_name {
        writeln!(out, "Nombre científico: '{}'", scientific)?;
    }
    writeln!(out, "Riego: cada {} días", plant.water_frequency_days)?;
    writeln!(out, "Último riego: {}", format_date(&plant.last_watered))?;
    writeln!(
        out,
        "Próximo riego: {} [{}]",
        format_date(&plant.next_watering()),
        urgency_label(plant.urgency(now))
    )?;
    if let Some(notes) = &plant.notes {
        writeln!(out, "Notas: {}", notes)?;
    }
    if let Some(image) = &plant.image_reference {
        writeln!(out, "Imagen: {}", image)?;
    }
    writeln!(out, "ID: '{}'\n", plant.id)?;

    match plant.scientific_name.as_deref().and_then(care::lookup) {
        Some(guide) => render_care(out, guide),
        None => {
            writeln!(out, "Consejos generales:")?;
            for tip in care::GENERAL_TIPS {
                writeln!(out, "  - {}", tip)?;
            }
            Ok(())
        }
    }
}

pub fn render_reminders<W: Write, Tz: TimeZone>(out: &mut W, plants: &[PlantRecord], now: &DateTime<Tz>) -> fmt::Result {
    let today = due_today(plants, now);
    let late = overdue(plants, now);

    if today.is_empty() {
        writeln!(out, "Ninguna planta necesita riego hoy.")?;
    } else {
        writeln!(out, "Plantas para regar hoy ({}):", today.count())?;
        for plant in today.plants() {
            writeln!(out, "  - {} ({})", plant.name, plant.species)?;
        }
    }
    if !late.is_empty() {
        writeln!(out, "Atrasadas ({}):", late.count())?;
        for plant in late.plants() {
            writeln!(
                out,
                "  - {} ({}), tocaba el {}",
                plant.name,
                plant.species,
                format_date(&plant.next_watering())
            )?;
        }
    }
    Ok(())
}

pub fn render_guide<W: Write>(out: &mut W, scientific_name: Option<&str>) -> fmt::Result {
    match scientific_name {
        Some(name) => match care::lookup(name) {
            Some(guide) => render_care(out, guide),
            None => writeln!(out, "No hay guía de cuidados para '{}'.", name.trim()),
        },
        None => {
            writeln!(out, "Plantas con guía de cuidados:")?;
            for (common, scientific) in care::common_plants() {
                writeln!(out, "  - {} ({})", common, scientific)?;
            }
            Ok(())
        }
    }
}

fn render_care<W: Write>(out: &mut W, guide: &CareGuide) -> fmt::Result {
    writeln!(
        out,
        "Cuidados óptimos para {} ({}):\n  Temperatura: {}\n  Luz: {}\n  Humedad: {}\n  Riego: {}\n  Suelo: {}\n  Fertilizante: {}",
        guide.common_name,
        guide.scientific_name,
        guide.temperature,
        guide.sunlight,
        guide.humidity,
        guide.watering,
        guide.soil,
        guide.fertilizer,
    )
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use plantcare::schedule::parse_timestamp;

    use super::*;

    fn rendered(render: impl FnOnce(&mut String) -> fmt::Result) -> String {
        let mut out = String::new();
        render(&mut out).unwrap();
        out
    }

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s, &FixedOffset::east_opt(0).unwrap()).unwrap()
    }

    fn plant(name: &str, last_watered: &str, frequency: u32, scientific: Option<&str>) -> PlantRecord {
        let draft = PlantDraft {
            name: name.to_string(),
            species: "Común".to_string(),
            scientific_name: scientific.map(str::to_string),
            water_frequency_days: frequency,
            last_watered: Some(ts(last_watered)),
            ..Default::default()
        };
        PlantRecord::from_draft(format!("id-{name}"), draft, ts(last_watered), &chrono::Utc).unwrap()
    }

    #[test]
    fn list_shows_thirsty_plants_first() {
        let now = ts("2024-03-10T12:00:00");
        let plants = vec![
            plant("Ivy", "2024-03-09T12:00:00", 7, None),
            plant("Fern", "2024-03-01T12:00:00", 7, None),
        ];
        let out = rendered(|out| render_list(out, &plants, &now, true));
        assert_eq!(out, "id-Fern, 'Fern'\nid-Ivy, 'Ivy'\n");
        assert!(rendered(|out| render_list(out, &plants, &now, false)).contains("¡Necesita agua!"));
    }

    #[test]
    fn empty_list_has_hint() {
        let out = rendered(|out| render_list(out, &[], &ts("2024-03-10T12:00:00"), false));
        assert!(out.contains("No hay plantas"));
    }

    #[test]
    fn details_include_care_guide_when_known() {
        let now = ts("2024-03-10T12:00:00");
        let known = plant("Monty", "2024-03-09T12:00:00", 7, Some("monstera deliciosa"));
        let out = rendered(|out| render_details(out, &known, &now));
        assert!(out.contains("Cuidados óptimos para Monstera Deliciosa"));

        let unknown = plant("Rosa", "2024-03-09T12:00:00", 7, Some("Rosa chinensis"));
        let out = rendered(|out| render_details(out, &unknown, &now));
        assert!(out.contains("Consejos generales"));
        assert!(out.contains(care::GENERAL_TIPS[0]));
    }

    #[test]
    fn reminders_count_due_today_and_list_overdue() {
        let now = ts("2024-03-10T12:00:00");
        let plants = vec![
            plant("Aloe", "2024-03-09T02:00:00", 1, None),
            plant("Fern", "2024-03-01T12:00:00", 7, None),
            plant("Ivy", "2024-03-09T12:00:00", 7, None),
        ];
        let out = rendered(|out| render_reminders(out, &plants, &now));
        assert!(out.contains("Plantas para regar hoy (1):\n  - Aloe (Común)\n"));
        assert!(out.contains("Atrasadas (1):"));
        assert!(!out.contains("Ivy"));

        let none = rendered(|out| render_reminders(out, &plants[2..], &now));
        assert_eq!(none, "Ninguna planta necesita riego hoy.\n");
    }

    #[test]
    fn guide_lists_or_looks_up() {
        assert!(rendered(|out| render_guide(out, None)).contains("Pothos (Epipremnum aureum)"));
        assert!(rendered(|out| render_guide(out, Some("FICUS LYRATA"))).contains("Fiddle Leaf Fig"));
        assert!(rendered(|out| render_guide(out, Some("Ficus elastica"))).starts_with("No hay guía"));
    }

    struct Refusing;

    impl Write for Refusing {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn write_failures_reach_the_caller() {
        let now = ts("2024-03-10T12:00:00");
        let plants = vec![plant("Ivy", "2024-03-09T12:00:00", 7, None)];
        assert!(render_list(&mut Refusing, &plants, &now, false).is_err());
        assert!(render_details(&mut Refusing, &plants[0], &now).is_err());
        assert!(render_reminders(&mut Refusing, &plants, &now).is_err());
        assert!(render_guide(&mut Refusing, None).is_err());
    }
}
