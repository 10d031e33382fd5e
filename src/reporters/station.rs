use crate::reporters::types::{StationStats, ValueCount};
use crate::reporters::utility::mode;
use crate::table::{TripTable, route};

fn owned(m: ValueCount<&String>) -> ValueCount<String> {
    m.map(String::clone)
}

/// Most common start station, end station and start-to-end route.
///
/// Routes are built from the rows of `table` only, so a filtered table gives
/// the most common route for that selection. Missing station cells are
/// skipped, and a row missing either end has no route.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn report_station_stats(table: &TripTable) -> StationStats {
    let routes = table
        .start_stations()
        .iter()
        .zip(table.end_stations())
        .filter_map(|(start, end)| Some(route(start.as_ref()?, end.as_ref()?)));

    StationStats {
        common_start_station: mode(table.start_stations().iter().flatten()).map(owned),
        common_end_station: mode(table.end_stations().iter().flatten()).map(owned),
        common_route: mode(routes),
    }
}
