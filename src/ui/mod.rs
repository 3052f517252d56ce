/// UI layer: strictly a caller of the data layer. Panels own the
/// selection widgets, views run `filter` + `aggregate` and hand the
/// resulting series to the chart helpers.

pub mod charts;
pub mod panels;
pub mod views;
