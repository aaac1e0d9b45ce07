/// Formatea segundos como `m:ss` (p. ej. `7:05`). Los negativos cuentan como cero.
pub fn format_clock(seconds: f64) -> String {
  let total = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
  format!("{}:{:02}", total / 60, total % 60)
}
