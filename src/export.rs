use std::{
    fs,
    path::{Path, PathBuf},
};

use strum::IntoEnumIterator;

use crate::{
    algo::tabular::QTable,
    artifact::next_file_name,
    error::Result,
    gym::penalty_kick::{Action, PenaltyKick},
};

/// Write one heatmap per action into a new numbered CSV file in `dir`
///
/// Each action contributes `size` rows of `action,row,<value per column>`. Values are
/// rounded to two decimals, goal cells are masked as `G` and obstacle cells as `H`.
///
/// **Returns** the path of the written file
pub fn export_heatmaps(table: &QTable, env: &PenaltyKick, dir: &Path) -> Result<PathBuf> {
    table.check_size(env.size())?;
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", next_file_name(dir, "csv")?));

    let size = env.size();
    let mut wtr = csv::Writer::from_path(&path)?;

    let header = ["action".to_string(), "row".to_string()]
        .into_iter()
        .chain((0..size).map(|col| col.to_string()));
    wtr.write_record(header)?;

    for action in Action::iter() {
        for row in 0..size {
            let cells = (0..size).map(|col| {
                let pos = (row, col);
                if env.goals().values().any(|&g| g == pos) {
                    String::from("G")
                } else if env.obstacles().iter().any(|o| o.pos == pos) {
                    String::from("H")
                } else {
                    format!("{:.2}", table.get(pos, action))
                }
            });
            let record = [action.to_string(), row.to_string()]
                .into_iter()
                .chain(cells);
            wtr.write_record(record)?;
        }
    }

    wtr.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    use super::*;

    #[test]
    fn heatmaps_mask_goals_and_obstacles() {
        let dir = tempfile::tempdir().unwrap();
        let env = Config::default().build_env().unwrap();
        let mut table = QTable::zeros(9);
        table.set((4, 7), Action::Right, 9.876);

        let first = export_heatmaps(&table, &env, dir.path()).unwrap();
        let second = export_heatmaps(&table, &env, dir.path()).unwrap();
        assert_eq!(first.file_name().unwrap(), "1.csv");
        assert_eq!(second.file_name().unwrap(), "2.csv");

        let mut rdr = csv::Reader::from_path(&first).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4 * 9);

        let right_row_4 = rows
            .iter()
            .find(|r| &r[0] == "Right" && &r[1] == "4")
            .unwrap();
        assert_eq!(&right_row_4[2 + 7], "9.88");
        assert_eq!(&right_row_4[2 + 8], "G");
        assert_eq!(&right_row_4[2 + 6], "H");
        assert_eq!(&right_row_4[2], "0.00");
    }
}
