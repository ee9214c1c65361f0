// src/schema/mod.rs
use anyhow::{bail, Result};

mod types;
pub use types::Column;

/// Drive-motor layout of the logging vehicle. A closed set: the two
/// known drivetrains differ only in how many rear inverter temperatures
/// the logger reports, and the destination schema follows suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorLayout {
    /// One front + one rear motor; a single `rear_inverter_temp`.
    Dual,
    /// One front + two rear motors; `rear_left_inverter_temp` and
    /// `rear_right_inverter_temp`.
    Tri,
}

impl MotorLayout {
    /// Map the motor-count selector onto a layout. Anything but 2 or 3
    /// is a configuration error surfaced to the operator, never a
    /// silent skip.
    pub fn from_motor_count(count: u32) -> Result<MotorLayout> {
        match count {
            2 => Ok(MotorLayout::Dual),
            3 => Ok(MotorLayout::Tri),
            other => bail!("unsupported motor count {} (expected 2 or 3)", other),
        }
    }

    /// The fixed destination column list for this layout, in table
    /// order. Matches the transformed artifact column-for-column.
    pub fn columns(self) -> Vec<Column> {
        let mut cols = vec![
            Column::new("time", "TIMESTAMP"),
            Column::new("session", "INTEGER"),
            Column::new("lap", "INTEGER"),
            Column::new("elapsed_time", "INTEGER"),
        ];

        for name in [
            "speed",
            "latitude",
            "longitude",
            "lateral_acceleration",
            "longitudinal_acceleration",
            "throttle_position",
            "brake_pressure",
            "steering_angle",
            "steering_angle_rate",
            "yaw_rate",
            "power_level",
            "state_of_charge",
            "tire_pressure_front_left",
            "tire_pressure_front_right",
            "tire_pressure_rear_left",
            "tire_pressure_rear_right",
            "brake_temperature_front_left",
            "brake_temperature_front_right",
            "brake_temperature_rear_left",
            "brake_temperature_rear_right",
            "front_inverter_temp",
        ] {
            cols.push(Column::new(name, "FLOAT"));
        }

        match self {
            MotorLayout::Dual => cols.push(Column::new("rear_inverter_temp", "FLOAT")),
            MotorLayout::Tri => {
                cols.push(Column::new("rear_left_inverter_temp", "FLOAT"));
                cols.push(Column::new("rear_right_inverter_temp", "FLOAT"));
            }
        }

        for name in [
            "battery_temp",
            "tire_slip_front_left",
            "tire_slip_front_right",
            "tire_slip_rear_left",
            "tire_slip_rear_right",
        ] {
            cols.push(Column::new(name, "FLOAT"));
        }

        cols
    }
}

/// Render the idempotent DDL for the destination table.
pub fn create_table_sql(table: &str, layout: MotorLayout) -> String {
    let cols = layout
        .columns()
        .iter()
        .map(|c| format!("    {} {}", c.name, c.ty))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", table, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn motor_count_maps_onto_the_closed_layout_set() -> Result<()> {
        assert_eq!(MotorLayout::from_motor_count(2)?, MotorLayout::Dual);
        assert_eq!(MotorLayout::from_motor_count(3)?, MotorLayout::Tri);
        Ok(())
    }

    #[test]
    fn unrecognized_motor_count_is_a_reported_error() {
        let err = MotorLayout::from_motor_count(4).unwrap_err();
        assert!(err.to_string().contains("unsupported motor count 4"));
    }

    #[test]
    fn layouts_differ_only_in_rear_inverter_columns() {
        let dual: HashSet<String> = MotorLayout::Dual
            .columns()
            .into_iter()
            .map(|c| c.name)
            .collect();
        let tri: HashSet<String> = MotorLayout::Tri
            .columns()
            .into_iter()
            .map(|c| c.name)
            .collect();

        let only_dual: HashSet<_> = dual.difference(&tri).cloned().collect();
        let only_tri: HashSet<_> = tri.difference(&dual).cloned().collect();
        assert_eq!(only_dual, HashSet::from(["rear_inverter_temp".to_string()]));
        assert_eq!(
            only_tri,
            HashSet::from([
                "rear_left_inverter_temp".to_string(),
                "rear_right_inverter_temp".to_string(),
            ])
        );
    }

    #[test]
    fn columns_lead_with_time_and_session() {
        for layout in [MotorLayout::Dual, MotorLayout::Tri] {
            let cols = layout.columns();
            assert_eq!(cols[0], Column::new("time", "TIMESTAMP"));
            assert_eq!(cols[1], Column::new("session", "INTEGER"));
            assert_eq!(cols[2], Column::new("lap", "INTEGER"));
            assert_eq!(cols[3], Column::new("elapsed_time", "INTEGER"));
        }
    }

    #[test]
    fn dual_layout_has_one_fewer_column_than_tri() {
        assert_eq!(
            MotorLayout::Dual.columns().len() + 1,
            MotorLayout::Tri.columns().len()
        );
    }

    #[test]
    fn ddl_is_idempotent_create() {
        let sql = create_table_sql("buttonwillow_tc38_20241221", MotorLayout::Dual);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS buttonwillow_tc38_20241221 ("));
        assert!(sql.contains("    time TIMESTAMP,"));
        assert!(sql.contains("    rear_inverter_temp FLOAT,"));
        assert!(!sql.contains("rear_left_inverter_temp"));
    }
}
