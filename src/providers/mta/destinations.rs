//! Static per-line table of plausible termini, keyed by travel direction.

use super::board::Direction;
use super::jitter::JitterSource;

/// Plausible termini for a line in a given direction. Branching services
/// list more than one; unknown lines and unknown directions list none.
pub fn termini(line: &str, direction: Direction) -> &'static [&'static str] {
    match (line, direction) {
        ("A", Direction::Uptown) => &["Inwood-207 St"],
        ("A", Direction::Downtown) => &["Far Rockaway-Mott Av", "Ozone Park-Lefferts Blvd"],
        ("C", Direction::Uptown) => &["168 St"],
        ("C", Direction::Downtown) => &["Euclid Av"],
        ("E", Direction::Uptown) => &["Jamaica Center-Parsons/Archer"],
        ("E", Direction::Downtown) => &["World Trade Center"],
        ("B", Direction::Uptown) => &["Bedford Park Blvd"],
        ("B", Direction::Downtown) => &["Brighton Beach"],
        ("D", Direction::Uptown) => &["Norwood-205 St"],
        ("D", Direction::Downtown) => &["Coney Island-Stillwell Av"],
        ("F", Direction::Uptown) => &["Jamaica-179 St"],
        ("F", Direction::Downtown) => &["Coney Island-Stillwell Av"],
        ("M", Direction::Uptown) => &["Forest Hills-71 Av"],
        ("M", Direction::Downtown) => &["Middle Village-Metropolitan Av"],
        ("G", Direction::Uptown) => &["Court Sq"],
        ("G", Direction::Downtown) => &["Church Av"],
        ("J", Direction::Uptown) => &["Jamaica Center-Parsons/Archer"],
        ("J", Direction::Downtown) => &["Broad St"],
        ("Z", Direction::Uptown) => &["Jamaica Center-Parsons/Archer"],
        ("Z", Direction::Downtown) => &["Broad St"],
        ("N", Direction::Uptown) => &["Astoria-Ditmars Blvd"],
        ("N", Direction::Downtown) => &["Coney Island-Stillwell Av"],
        ("Q", Direction::Uptown) => &["96 St"],
        ("Q", Direction::Downtown) => &["Coney Island-Stillwell Av"],
        ("R", Direction::Uptown) => &["Forest Hills-71 Av"],
        ("R", Direction::Downtown) => &["Bay Ridge-95 St"],
        ("W", Direction::Uptown) => &["Astoria-Ditmars Blvd"],
        ("W", Direction::Downtown) => &["Whitehall St"],
        ("L", Direction::Uptown) => &["8 Av"],
        ("L", Direction::Downtown) => &["Canarsie-Rockaway Pkwy"],
        ("1", Direction::Uptown) => &["Van Cortlandt Park-242 St"],
        ("1", Direction::Downtown) => &["South Ferry"],
        ("2", Direction::Uptown) => &["Wakefield-241 St"],
        ("2", Direction::Downtown) => &["Flatbush Av-Brooklyn College"],
        ("3", Direction::Uptown) => &["Harlem-148 St"],
        ("3", Direction::Downtown) => &["New Lots Av"],
        ("4", Direction::Uptown) => &["Woodlawn"],
        ("4", Direction::Downtown) => &["Crown Hts-Utica Av", "New Lots Av"],
        ("5", Direction::Uptown) => &["Eastchester-Dyre Av", "Nereid Av"],
        ("5", Direction::Downtown) => &["Flatbush Av-Brooklyn College"],
        ("6", Direction::Uptown) => &["Pelham Bay Park", "Parkchester"],
        ("6", Direction::Downtown) => &["Brooklyn Bridge-City Hall"],
        ("7", Direction::Uptown) => &["Flushing-Main St"],
        ("7", Direction::Downtown) => &["34 St-Hudson Yards"],
        _ => &[],
    }
}

/// Rider-facing destination label for one arrival. Branch termini are chosen
/// uniformly per arrival; a lookup miss resolves to "Unknown".
pub fn pick(line: &str, direction: Direction, jitter: &dyn JitterSource) -> String {
    let options = termini(line, direction);
    match options.len() {
        0 => "Unknown".to_string(),
        1 => options[0].to_string(),
        len => options[jitter.pick(len)].to_string(),
    }
}
