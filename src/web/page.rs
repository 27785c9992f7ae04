use itertools::Itertools;

use crate::{model::Stop, utils::escape_html};

/// Result of the "optimize and display" action.
#[derive(Debug)]
pub enum RouteSection {
    /// `unresolved` holds the registry positions that got no marker.
    Map {
        map_html: String,
        unresolved: Vec<usize>,
    },
    Warning(String),
}

const HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dispatching</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <style>
    body { font-family: sans-serif; margin: 2rem auto; max-width: 960px; }
    form.add { display: grid; grid-template-columns: 1fr 1fr; gap: 0.5rem 2rem; }
    form.add label { display: flex; flex-direction: column; }
    ol.stops { padding-left: 0; list-style: none; }
    ol.stops li { display: flex; justify-content: space-between; padding: 0.25rem 0; }
    .info { background: #e8f1fb; padding: 0.75rem; }
    .warning { background: #fff4d6; padding: 0.75rem; }
  </style>
</head>
"#;

const ADD_FORM: &str = r#"<form class="add" method="post" action="/stops">
  <div>
    <label>Type
      <select name="kind">
        <option value="pickup">Pickup</option>
        <option value="delivery">Delivery</option>
      </select>
    </label>
    <label>Scheduled time <input type="time" name="time" required /></label>
    <label>Priority
      <select name="priority">
        <option value="1">1</option>
        <option value="2">2</option>
        <option value="3">3</option>
      </select>
    </label>
  </div>
  <div>
    <label>Full address <input type="text" name="address" required /></label>
    <label>Comment (optional) <input type="text" name="comment" /></label>
  </div>
  <button type="submit">➕ Add</button>
</form>
"#;

fn stop_list(stops: &[Stop]) -> String {
    if stops.is_empty() {
        return r#"<p class="info">Add at least one address to get started.</p>"#.to_string();
    }

    let rows = stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            format!(
                r#"  <li><span class="stop-label">{n}. <strong>{kind}</strong> – {address} – {time} – Priority {priority}</span><form method="post" action="/stops/{i}/delete"><button type="submit" title="Delete">❌</button></form></li>"#,
                n = i + 1,
                kind = stop.kind,
                address = escape_html(&stop.address),
                time = stop.formatted_time(),
                priority = stop.priority.value(),
            )
        })
        .join("\n");

    format!("<h2>📋 Stops</h2>\n<ol class=\"stops\">\n{rows}\n</ol>\n")
}

fn route_section(stops: &[Stop], section: &RouteSection) -> String {
    match section {
        RouteSection::Warning(message) => {
            format!("<p class=\"warning\">{}</p>\n", escape_html(message))
        }
        RouteSection::Map {
            map_html,
            unresolved,
        } => {
            let missing = unresolved
                .iter()
                .filter_map(|&i| stops.get(i).map(|s| (i, s)))
                .map(|(i, s)| format!("<li>{}. {}</li>", i + 1, escape_html(&s.address)))
                .join("");
            let missing = if missing.is_empty() {
                String::new()
            } else {
                format!("<p>Addresses not found:</p>\n<ul class=\"unresolved\">{missing}</ul>\n")
            };

            format!("<h2>🗺️ Route map</h2>\n{map_html}\n{missing}")
        }
    }
}

/// The whole page: form, stop list, route action and, after the action, its result.
pub fn render_page(stops: &[Stop], section: Option<RouteSection>) -> String {
    let route_button = if stops.is_empty() {
        String::new()
    } else {
        r#"<form method="post" action="/route"><button type="submit">🗺️ Optimize and display route</button></form>"#
            .to_string()
    };
    let route = section
        .map(|s| route_section(stops, &s))
        .unwrap_or_default();

    format!(
        r#"{HEAD}<body>
<h1>🛻 Simplified Dispatching App</h1>
<p>Add your <strong>pickup</strong> and <strong>delivery</strong> addresses with their times, then see the optimized route on a map.</p>
{ADD_FORM}{list}{route_button}
{route}</body>
</html>
"#,
        list = stop_list(stops),
    )
}
