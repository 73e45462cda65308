use std::process::ExitCode;

use pgcopy_columnar::codec::decode_pgcopy;
use pgcopy_columnar::{Column, PgType};

#[cfg(feature = "tools-json")]
use serde::Serialize;

#[cfg_attr(feature = "tools-json", derive(Serialize))]
struct ColumnReport {
    index: usize,
    ty: &'static str,
    rows: usize,
    nulls: usize,
}

fn column_report(index: usize, column: &Column) -> ColumnReport {
    ColumnReport {
        index,
        ty: column.ty().name(),
        rows: column.len(),
        nulls: column.null_count(),
    }
}

fn parse_types(type_list: &str) -> Result<Vec<PgType>, String> {
    type_list
        .split(',')
        .map(str::trim)
        .map(|name| {
            PgType::from_name(name).ok_or_else(|| format!("unknown column type name: {name}"))
        })
        .collect()
}

fn run(path: &str, type_list: &str, json: bool) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let types = parse_types(type_list)?;
    let columns = decode_pgcopy(&bytes, &types).map_err(|e| e.to_string())?;

    let rows = columns.first().map_or(0, Column::len);
    let reports: Vec<ColumnReport> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| column_report(index, column))
        .collect();

    if json {
        #[cfg(feature = "tools-json")]
        {
            let body = serde_json::json!({ "rows": rows, "columns": reports });
            println!(
                "{}",
                serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?
            );
            return Ok(());
        }
        #[cfg(not(feature = "tools-json"))]
        return Err("--json requires the tools-json feature".to_string());
    }

    println!("{rows} rows, {} columns", reports.len());
    for report in &reports {
        println!(
            "  [{}] {:<8} {} rows, {} nulls",
            report.index, report.ty, report.rows, report.nulls
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args.iter().filter(|a| *a != "--json").collect();

    let (path, type_list) = match positional.as_slice() {
        [path, type_list] => (path.as_str(), type_list.as_str()),
        _ => {
            eprintln!("usage: pgcopy_inspect [--json] <file> <type,type,...>");
            eprintln!("types: int16 int32 int64 float32 float64 bool text datetime date");
            return ExitCode::FAILURE;
        }
    };

    match run(path, type_list, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("pgcopy_inspect: {message}");
            ExitCode::FAILURE
        }
    }
}
