// Format an event count with SI scaling.
pub fn format_count(count: u64) -> String {
    const K: u64 = 1_000;
    const M: u64 = 1_000 * K;
    const G: u64 = 1_000 * M;

    if count >= G {
        format!("{:.2} G", count as f64 / G as f64)
    } else if count >= M {
        format!("{:.2} M", count as f64 / M as f64)
    } else if count >= K {
        format!("{:.2} K", count as f64 / K as f64)
    } else {
        format!("{}", count)
    }
}

// Format events per second, same scaling as `format_count`.
pub fn format_rate(per_sec: f64) -> String {
    const K: f64 = 1_000.0;
    const M: f64 = 1_000.0 * K;
    const G: f64 = 1_000.0 * M;

    if per_sec >= G {
        format!("{:.2} G ev/s", per_sec / G)
    } else if per_sec >= M {
        format!("{:.2} M ev/s", per_sec / M)
    } else if per_sec >= K {
        format!("{:.2} K ev/s", per_sec / K)
    } else {
        format!("{:.0} ev/s", per_sec)
    }
}
