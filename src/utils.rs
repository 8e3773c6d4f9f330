#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    pool: web::Data<DbPool>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](pool, info).await {
                        Ok(response) => response,
                        Err(err) => $response::err(err.to_string()),
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime};

pub fn parse_time_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDateTime> {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
    const TIME_FMT_SPECIAL: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

    let s = s.as_ref();
    if let Some('Z') = s.chars().last() {
        NaiveDateTime::parse_from_str(s, TIME_FMT_SPECIAL).context("Wrong timestamp format")
    } else {
        DateTime::parse_from_str(s, TIME_FMT)
            .context("Wrong timestamp format")
            .map(|t| t.naive_utc())
    }
}

pub fn parse_time_pair_str<S1: AsRef<str>, S2: AsRef<str>>(
    start_time: S1,
    end_time: S2,
) -> anyhow::Result<(NaiveDateTime, NaiveDateTime)> {
    let start_time = parse_time_str(start_time).context("Wrong format on 'start_time'")?;
    let end_time = parse_time_str(end_time).context("Wrong format on 'end_time'")?;
    Ok((start_time, end_time))
}

pub fn parse_time_pair_str_opt<S1: AsRef<str>, S2: AsRef<str>>(
    start_time: Option<S1>,
    end_time: Option<S2>,
) -> anyhow::Result<(NaiveDateTime, NaiveDateTime)> {
    let time_min = parse_time_str("1901-01-01T00:00:00.0000Z")?;
    let time_max = parse_time_str("2901-01-01T00:00:00.0000Z")?;
    let start_time = start_time.map_or(Ok(time_min), |t| {
        parse_time_str(t).context("Wrong format on 'start_time'")
    })?;
    let end_time = end_time.map_or(Ok(time_max), |t| {
        parse_time_str(t).context("Wrong format on 'end_time'")
    })?;
    Ok((start_time, end_time))
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    format!("{}+00:00", time.format(TIME_FMT))
}

pub fn get_str_pattern<S: AsRef<str>>(s: S) -> String {
    format!("%{}%", s.as_ref())
}

pub fn get_str_pattern_opt<S: AsRef<str>>(s: Option<S>) -> String {
    match s {
        Some(s) => get_str_pattern(s),
        None => "%".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_and_zulu_timestamps() {
        let a = parse_time_str("2024-05-06T10:00:00.000+00:00").unwrap();
        let b = parse_time_str("2024-05-06T10:00:00.000Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_time_str("next monday").is_err());
    }

    #[test]
    fn format_round_trips() {
        let t = parse_time_str("2024-05-06T10:30:00.000Z").unwrap();
        assert_eq!(parse_time_str(format_time_str(&t)).unwrap(), t);
    }

    #[test]
    fn missing_bounds_default_to_wide_window() {
        let (lo, hi) = parse_time_pair_str_opt::<String, String>(None, None).unwrap();
        assert!(lo < parse_time_str("2000-01-01T00:00:00Z").unwrap());
        assert!(hi > parse_time_str("2800-01-01T00:00:00Z").unwrap());
    }

    #[test]
    fn pattern_helpers() {
        assert_eq!(get_str_pattern("alg"), "%alg%");
        assert_eq!(get_str_pattern_opt::<&str>(None), "%");
    }
}
