/// Lays month days out in Monday-first weeks. Cells before day 1 and after
/// the last day are `None`.
pub fn weeks<T: Clone>(first_weekday_index: u32, days: &[T]) -> Vec<Vec<Option<T>>> {
    let lead = first_weekday_index.min(6) as usize;
    let mut cells: Vec<Option<T>> = Vec::with_capacity(lead + days.len() + 6);
    cells.extend(std::iter::repeat_with(|| None).take(lead));
    cells.extend(days.iter().cloned().map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }
    cells.chunks(7).map(|week| week.to_vec()).collect()
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
