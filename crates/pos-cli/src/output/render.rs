//! Human-readable summaries of daemon replies.

use pos_messages::{Command, Response};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Columns of the `volume list` table paired with their `data.volumes` keys.
const VOLUME_COLUMNS: &[(&str, &str)] = &[
    ("Name", "name"),
    ("ID", "id"),
    ("Total", "total"),
    ("Remaining", "remain"),
    ("Status", "status"),
    ("MaxIOPS", "maxiops"),
    ("MaxBW", "maxbw"),
];

const MISSING_CELL: &str = "-";

/// Renders the reply to `command` as text terminated by a newline.
pub(crate) fn summary(command: &Command, response: &Response) -> String {
    let label = command.id().label();
    if !response.is_success() {
        return match response.description() {
            Some(description) => format!(
                "{label} failed with code {}: {description}\n",
                response.code()
            ),
            None => format!("{label} failed with code {}\n", response.code()),
        };
    }

    match command {
        Command::ListVolume(_) => volume_table(response.data()),
        Command::SystemVersion => match version(response.data()) {
            Some(version) => format!("{version}\n"),
            None => format!("{label}: succeeded\n"),
        },
        Command::SystemInfo => match response.data() {
            Some(data) => key_values(data),
            None => format!("{label}: succeeded\n"),
        },
        _ => format!("{label}: {}\n", success_message(command)),
    }
}

fn success_message(command: &Command) -> String {
    match command {
        Command::StartSystem => String::from("PoseidonOS has started"),
        Command::StopSystem => String::from("PoseidonOS is shutting down"),
        Command::CreateVolume(param) => format!(
            "volume {} created successfully in array {}",
            param.volume_name, param.array_name
        ),
        Command::DeleteVolume(param) => format!(
            "volume {} deleted from array {}",
            param.volume_name, param.array_name
        ),
        Command::MountVolume(param) => format!(
            "volume {} mounted in array {}",
            param.volume_name, param.array_name
        ),
        Command::UnmountVolume(param) => format!(
            "volume {} unmounted in array {}",
            param.volume_name, param.array_name
        ),
        Command::RenameVolume(param) => format!(
            "volume {} renamed to {} in array {}",
            param.volume_name, param.new_name, param.array_name
        ),
        Command::ResizeVolume(param) => format!(
            "volume {} resized to {} in array {}",
            param.volume_name, param.size, param.array_name
        ),
        Command::UpdateVolumeQos(param) => format!(
            "volume {} limited to maxiops {} and maxbw {} in array {}",
            param.volume_name, param.max_iops, param.max_bandwidth, param.array_name
        ),
        Command::ListVolume(_) | Command::SystemInfo | Command::SystemVersion => {
            String::from("succeeded")
        }
    }
}

fn version(data: Option<&Value>) -> Option<&str> {
    data?.get("version")?.as_str()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::from(MISSING_CELL),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn volume_table(data: Option<&Value>) -> String {
    let volumes = data
        .and_then(|data| data.get("volumes"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if volumes.is_empty() {
        return String::from("no volumes found\n");
    }

    let rows: Vec<Vec<String>> = volumes
        .iter()
        .map(|volume| {
            VOLUME_COLUMNS
                .iter()
                .map(|(_, key)| cell(volume.get(key)))
                .collect()
        })
        .collect();
    let header: Vec<String> = VOLUME_COLUMNS
        .iter()
        .map(|(title, _)| (*title).to_owned())
        .collect();

    let widths: Vec<usize> = (0..VOLUME_COLUMNS.len())
        .map(|column| {
            std::iter::once(&header)
                .chain(rows.iter())
                .filter_map(|row| row.get(column))
                .map(|text| text.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        output.push_str(&table_line(row, &widths));
    }
    output
}

fn table_line(row: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(text, width)| {
            let padding = width.saturating_sub(text.width());
            format!("{text}{}", " ".repeat(padding))
        })
        .collect();
    let mut line = cells.join("  ").trim_end().to_owned();
    line.push('\n');
    line
}

fn key_values(data: &Value) -> String {
    let Some(entries) = data.as_object().filter(|entries| !entries.is_empty()) else {
        return format!("{data}\n");
    };
    let width = entries.keys().map(|key| key.width()).max().unwrap_or(0);
    let mut sorted: Vec<(&String, &Value)> = entries.iter().collect();
    sorted.sort_by(|left, right| left.0.cmp(right.0));
    sorted
        .into_iter()
        .map(|(key, value)| {
            let padding = width.saturating_sub(key.width());
            format!("{key}:{} {}\n", " ".repeat(padding), cell(Some(value)))
        })
        .collect()
}
