//! football-data.org standings provider.
//!
//! Fetches a competition's final table from the v4 REST API
//! (`/competitions/{code}/standings?season={year}`). Transient failures
//! (connect/timeout, 429, 5xx) are retried a bounded number of times with
//! exponential backoff, waiting at least as long as a 429's `Retry-After`;
//! auth failures are returned immediately.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::provider::{DataError, DataSource, FetchResult, StandingsProvider};
use crate::domain::{Season, TeamRecord};

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
pub const DEFAULT_COMPETITION: &str = "PL";

/// Standings endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct StandingsResponse {
    #[serde(default)]
    standings: Vec<Standing>,
}

#[derive(Debug, Deserialize)]
struct Standing {
    /// `TOTAL`, `HOME` or `AWAY`. Older payloads omit it.
    #[serde(rename = "type", default)]
    kind: Option<String>,
    table: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableEntry {
    position: u32,
    team: TeamRef,
    played_games: u32,
    won: u32,
    draw: u32,
    lost: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: Option<i64>,
    points: u32,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    name: String,
}

/// Connection settings for [`FootballDataProvider`].
#[derive(Debug, Clone)]
pub struct FootballDataConfig {
    pub base_url: String,
    pub competition: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Longest `Retry-After` worth waiting for; beyond it a 429 fails at once.
    pub max_retry_wait: Duration,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for FootballDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            competition: DEFAULT_COMPETITION.to_string(),
            api_token: None,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_retry_wait: Duration::from_secs(30),
            use_system_proxy: true,
        }
    }
}

/// football-data.org standings provider.
pub struct FootballDataProvider {
    client: reqwest::blocking::Client,
    config: FootballDataConfig,
}

impl FootballDataProvider {
    pub fn new(config: FootballDataConfig) -> Result<Self, DataError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("leaguelab/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Build the standings URL for a competition and season.
    fn standings_url(&self, season: Season) -> String {
        format!(
            "{}/competitions/{}/standings?season={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.competition,
            season.start_year
        )
    }

    /// Normalize a standings payload into TeamRecords.
    pub(crate) fn parse_response(
        season: Season,
        resp: StandingsResponse,
    ) -> Result<Vec<TeamRecord>, DataError> {
        let mut standings = resp.standings;
        if standings.is_empty() {
            return Err(DataError::SeasonNotFound {
                season: season.label(),
            });
        }
        let idx = standings
            .iter()
            .position(|s| s.kind.as_deref() == Some("TOTAL"))
            .unwrap_or(0);
        let standing = standings.swap_remove(idx);

        if standing.table.is_empty() {
            return Err(DataError::ResponseFormatChanged(format!(
                "empty table for season {season}"
            )));
        }

        let table = standing
            .table
            .into_iter()
            .map(|entry| {
                if let Some(gd) = entry.goal_difference {
                    let expected = i64::from(entry.goals_for) - i64::from(entry.goals_against);
                    if gd != expected {
                        warn!(
                            team = %entry.team.name,
                            reported = gd,
                            expected,
                            "goal difference does not match goals for/against"
                        );
                    }
                }
                TeamRecord {
                    name: entry.team.name,
                    original_position: entry.position,
                    played: entry.played_games,
                    won: entry.won,
                    drawn: entry.draw,
                    lost: entry.lost,
                    goals_for: entry.goals_for,
                    goals_against: entry.goals_against,
                    original_points: entry.points,
                }
            })
            .collect();

        Ok(table)
    }

    /// Execute the request with bounded retry on transient failures.
    fn fetch_with_retry(&self, season: Season) -> Result<Vec<TeamRecord>, DataError> {
        let url = self.standings_url(season);
        let mut last_error = None;
        let mut retry_after: Option<Duration> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.base_delay * 2u32.pow(attempt - 1);
                let delay = backoff.max(retry_after.take().unwrap_or(Duration::ZERO));
                debug!(%season, attempt, ?delay, "retrying standings request");
                std::thread::sleep(delay);
            }

            let mut request = self.client.get(&url);
            if let Some(token) = &self.config.api_token {
                request = request.header("X-Auth-Token", token);
            }

            match request.send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(DataError::AuthenticationRequired(format!(
                            "HTTP {status} from football-data.org (check the API token and plan)"
                        )));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(DataError::SeasonNotFound {
                            season: season.label(),
                        });
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let header_secs = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.trim().parse::<u64>().ok());
                        let error = DataError::RateLimited {
                            retry_after_secs: header_secs.unwrap_or(60),
                        };
                        if let Some(secs) = header_secs {
                            let wait = Duration::from_secs(secs);
                            if wait > self.config.max_retry_wait {
                                warn!(%season, retry_after = secs, "rate limit wait too long, giving up");
                                return Err(error);
                            }
                            retry_after = Some(wait);
                        }
                        warn!(%season, retry_after = ?header_secs, "rate limited by football-data.org");
                        last_error = Some(error);
                        continue;
                    }

                    if status.is_server_error() {
                        last_error = Some(DataError::Other(format!("HTTP {status} for {season}")));
                        continue;
                    }

                    if !status.is_success() {
                        return Err(DataError::Other(format!("HTTP {status} for {season}")));
                    }

                    let body: StandingsResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse standings for {season}: {e}"
                        ))
                    })?;

                    return Self::parse_response(season, body);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl StandingsProvider for FootballDataProvider {
    fn name(&self) -> &str {
        "football_data"
    }

    fn fetch(&self, season: Season) -> Result<FetchResult, DataError> {
        debug!(%season, competition = %self.config.competition, "fetching standings");
        let table = self.fetch_with_retry(season)?;
        Ok(FetchResult {
            season,
            table,
            source: DataSource::FootballData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "filters": {"season": "2016"},
        "competition": {"code": "PL"},
        "standings": [
            {
                "stage": "REGULAR_SEASON",
                "type": "HOME",
                "table": [
                    {"position": 1, "team": {"id": 61, "name": "Chelsea FC"},
                     "playedGames": 19, "won": 17, "draw": 1, "lost": 1,
                     "goalsFor": 55, "goalsAgainst": 17, "goalDifference": 38, "points": 52}
                ]
            },
            {
                "stage": "REGULAR_SEASON",
                "type": "TOTAL",
                "table": [
                    {"position": 1, "team": {"id": 61, "name": "Chelsea FC"},
                     "playedGames": 38, "won": 30, "draw": 3, "lost": 5,
                     "goalsFor": 85, "goalsAgainst": 33, "goalDifference": 52, "points": 93},
                    {"position": 2, "team": {"id": 73, "name": "Tottenham Hotspur FC"},
                     "playedGames": 38, "won": 26, "draw": 8, "lost": 4,
                     "goalsFor": 86, "goalsAgainst": 26, "goalDifference": 60, "points": 86}
                ]
            }
        ]
    }"#;

    fn provider() -> FootballDataProvider {
        FootballDataProvider::new(FootballDataConfig::default()).unwrap()
    }

    #[test]
    fn parses_total_standing() {
        let resp: StandingsResponse = serde_json::from_str(SAMPLE).unwrap();
        let table = FootballDataProvider::parse_response(Season::new(2016), resp).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].name, "Chelsea FC");
        assert_eq!(table[0].played, 38);
        assert_eq!(table[0].drawn, 3);
        assert_eq!(table[0].original_points, 93);
        assert_eq!(table[1].name, "Tottenham Hotspur FC");
        assert_eq!(table[1].original_position, 2);
        assert_eq!(table[1].goal_difference(), 60);
    }

    #[test]
    fn falls_back_to_first_standing_without_type() {
        let json = r#"{"standings": [{"table": [
            {"position": 1, "team": {"name": "Leicester City FC"},
             "playedGames": 38, "won": 23, "draw": 12, "lost": 3,
             "goalsFor": 68, "goalsAgainst": 36, "points": 81}
        ]}]}"#;
        let resp: StandingsResponse = serde_json::from_str(json).unwrap();
        let table = FootballDataProvider::parse_response(Season::new(2015), resp).unwrap();
        assert_eq!(table[0].name, "Leicester City FC");
        assert_eq!(table[0].won, 23);
    }

    #[test]
    fn missing_standings_is_season_not_found() {
        let resp: StandingsResponse = serde_json::from_str(r#"{"standings": []}"#).unwrap();
        let err = FootballDataProvider::parse_response(Season::new(1990), resp).unwrap_err();
        assert!(matches!(err, DataError::SeasonNotFound { ref season } if season == "1990-1991"));
    }

    #[test]
    fn empty_table_is_format_change() {
        let resp: StandingsResponse =
            serde_json::from_str(r#"{"standings": [{"type": "TOTAL", "table": []}]}"#).unwrap();
        let err = FootballDataProvider::parse_response(Season::new(2016), resp).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn standings_url_includes_competition_and_year() {
        let p = provider();
        assert_eq!(
            p.standings_url(Season::new(2016)),
            "https://api.football-data.org/v4/competitions/PL/standings?season=2016"
        );
    }

    #[test]
    fn standings_url_tolerates_trailing_slash() {
        let p = FootballDataProvider::new(FootballDataConfig {
            base_url: "http://localhost:8080/v4/".into(),
            competition: "2021".into(),
            ..FootballDataConfig::default()
        })
        .unwrap();
        assert_eq!(
            p.standings_url(Season::new(2020)),
            "http://localhost:8080/v4/competitions/2021/standings?season=2020"
        );
    }

    // ── Status handling against a loopback server ────────────────────

    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};

    const ONE_TEAM: &str = r#"{"standings": [{"type": "TOTAL", "table": [
        {"position": 1, "team": {"name": "Leicester City FC"},
         "playedGames": 38, "won": 23, "draw": 12, "lost": 3,
         "goalsFor": 68, "goalsAgainst": 36, "goalDifference": 32, "points": 81}
    ]}]}"#;

    fn canned(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{extra_headers}\r\n{body}",
            body.len()
        )
    }

    /// Serve `responses` in order, one per connection, recording each
    /// request head (lowercased). Returns the base URL and the log.
    fn serve(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v4", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        std::thread::spawn(move || {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let mut head = String::new();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                    head.push_str(&line.to_ascii_lowercase());
                }
                log.lock().unwrap().push(head);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        (base_url, requests)
    }

    fn loopback_provider(base_url: String, api_token: Option<&str>) -> FootballDataProvider {
        FootballDataProvider::new(FootballDataConfig {
            base_url,
            api_token: api_token.map(str::to_string),
            timeout: Duration::from_secs(5),
            base_delay: Duration::ZERO,
            use_system_proxy: false,
            ..FootballDataConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn unauthorized_fails_without_retry_and_sends_token() {
        let (url, requests) = serve(vec![canned("401 Unauthorized", "", "{}")]);
        let err = loopback_provider(url, Some("secret"))
            .fetch(Season::new(2016))
            .unwrap_err();

        assert!(matches!(err, DataError::AuthenticationRequired(_)));
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("x-auth-token: secret"));
        assert!(requests[0].starts_with("get /v4/competitions/pl/standings?season=2016 "));
    }

    #[test]
    fn forbidden_is_authentication_required() {
        let (url, requests) = serve(vec![canned("403 Forbidden", "", "{}")]);
        let err = loopback_provider(url, Some("secret"))
            .fetch(Season::new(2016))
            .unwrap_err();
        assert!(matches!(err, DataError::AuthenticationRequired(_)));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn not_found_is_season_not_found_and_omits_token() {
        let (url, requests) = serve(vec![canned("404 Not Found", "", "{}")]);
        let err = loopback_provider(url, None)
            .fetch(Season::new(1950))
            .unwrap_err();

        assert!(matches!(err, DataError::SeasonNotFound { ref season } if season == "1950-1951"));
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].contains("x-auth-token"));
    }

    #[test]
    fn rate_limit_is_retried_then_succeeds() {
        let (url, requests) = serve(vec![
            canned("429 Too Many Requests", "Retry-After: 0\r\n", "{}"),
            canned("200 OK", "", ONE_TEAM),
        ]);
        let fetched = loopback_provider(url, None).fetch(Season::new(2015)).unwrap();

        assert_eq!(fetched.source, DataSource::FootballData);
        assert_eq!(fetched.table.len(), 1);
        assert_eq!(fetched.table[0].name, "Leicester City FC");
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[test]
    fn long_retry_after_fails_immediately() {
        let (url, requests) = serve(vec![canned(
            "429 Too Many Requests",
            "Retry-After: 3600\r\n",
            "{}",
        )]);
        let err = loopback_provider(url, None)
            .fetch(Season::new(2015))
            .unwrap_err();

        assert!(matches!(err, DataError::RateLimited { retry_after_secs: 3600 }));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn server_errors_exhaust_retries() {
        let unavailable = canned("503 Service Unavailable", "", "{}");
        let (url, requests) = serve(vec![unavailable.clone(), unavailable.clone(), unavailable]);
        let err = loopback_provider(url, None)
            .fetch(Season::new(2015))
            .unwrap_err();

        assert!(matches!(err, DataError::Other(ref m) if m.contains("503")));
        // Default max_retries is 2: one attempt plus two retries.
        assert_eq!(requests.lock().unwrap().len(), 3);
    }
}
