use crate::models::AppData;
use crate::stats::date_key;
use chrono::{Duration, NaiveDate};

pub fn render_index(today: NaiveDate, data: &AppData) -> String {
    let mut rows = String::new();
    for offset in 0..7 {
        let key = date_key(today - Duration::days(offset));
        let sleep = data.sleep.get(&key);
        let steps = data.steps.get(&key);
        let heart = data.heart_rate.get(&key);
        let activity = data.activity.get(&key);

        rows.push_str(&format!(
            "<tr><td>{key}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            cell(sleep.map(|night| format_hm(night.total_minutes))),
            cell(sleep.map(|night| format_hm(night.deep_minutes))),
            cell(sleep.map(|night| format!("{:.0}%", night.efficiency_percent))),
            cell(sleep.and_then(|night| night.quality).map(|quality| quality.label().to_string())),
            cell(steps.map(|day| day.steps.to_string())),
            cell(heart.map(|day| format!("{:.1}", day.avg_bpm))),
            cell(activity.map(|day| format!("{:.0} kcal", day.calories))),
        ));
    }

    INDEX_HTML
        .replace("{{TODAY}}", &date_key(today))
        .replace("{{ROWS}}", &rows)
}

fn cell(value: Option<String>) -> String {
    value.unwrap_or_else(|| "&ndash;".to_string())
}

fn format_hm(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as i64;
    format!("{}h {:02}m", total / 60, total % 60)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Health Dashboard</title>
  <style>
    :root {
      --bg: #eef3f1;
      --ink: #1f2b2a;
      --accent: #2f8f83;
      --muted: #6b7b79;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(31, 43, 42, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #dcebe6 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
    }

    h1 {
      margin: 0 0 4px;
      font-size: 1.8rem;
    }

    .subtitle {
      margin: 0 0 24px;
      color: var(--muted);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-variant-numeric: tabular-nums;
    }

    th,
    td {
      padding: 10px 12px;
      text-align: right;
      border-bottom: 1px solid rgba(31, 43, 42, 0.08);
    }

    th:first-child,
    td:first-child {
      text-align: left;
    }

    th {
      color: var(--accent);
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Health Dashboard</h1>
    <p class="subtitle">Last 7 days up to {{TODAY}}</p>
    <table>
      <thead>
        <tr>
          <th>Date</th>
          <th>Sleep</th>
          <th>Deep</th>
          <th>Efficiency</th>
          <th>Quality</th>
          <th>Steps</th>
          <th>Avg BPM</th>
          <th>Calories</th>
        </tr>
      </thead>
      <tbody>
        {{ROWS}}
      </tbody>
    </table>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailySteps;

    #[test]
    fn renders_recorded_days_and_placeholders() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        let mut data = AppData::default();
        data.steps.insert(
            "2024-05-06".into(),
            DailySteps {
                date: "2024-05-06".into(),
                steps: 9876,
            },
        );

        let html = render_index(today, &data);
        assert!(html.contains("Last 7 days up to 2024-05-07"));
        assert!(html.contains("<td>2024-05-06</td>"));
        assert!(html.contains("<td>9876</td>"));
        assert!(html.contains("&ndash;"));
        assert!(!html.contains("{{ROWS}}"));
    }

    #[test]
    fn hours_and_minutes() {
        assert_eq!(format_hm(495.0), "8h 15m");
        assert_eq!(format_hm(59.6), "1h 00m");
    }
}
