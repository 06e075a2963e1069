//! 비밀번호를 한 줄 입력받아 맞을 때만 점수 평균을 출력하는 작은 CLI 입니다.
//!
//! ```not_rust
//! echo 1234 | cargo run -p example-password-gated-average
//! -> 1번, 평균 : 100.0
//!    2번, 평균 : 92.5
//!    ...
//! echo 0000 | cargo run -p example-password-gated-average
//! -> 잘못된비번
//! ```
//!
//! 비밀번호는 `AVG_PASSWORD` 환경 변수로 바꿀 수 있습니다 (기본값 `1234`).

use std::io::{self, BufRead, Write};

use anyhow::Context;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PASSWORD: &str = "1234";

/// 학생별 (국어, 영어) 점수
const SCORES: [(u32, u32); 5] = [(100, 100), (95, 90), (65, 20), (60, 90), (100, 60)];

#[derive(Debug, Error, PartialEq, Eq)]
enum GateError {
    #[error("잘못된비번")]
    WrongPassword,
}

/// 🏁 main()

fn main() -> anyhow::Result<()> {
    // 결과는 stdout, 로그는 stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let password =
        std::env::var("AVG_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_owned());

    run(io::stdin().lock(), io::stdout().lock(), &password)
}

fn run(mut input: impl BufRead, mut out: impl Write, password: &str) -> anyhow::Result<()> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read the password")?;
    let given = line.trim_end_matches(['\r', '\n']);

    match gated_averages(given, password) {
        Ok(lines) => {
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
        Err(err) => {
            tracing::warn!("password rejected");
            writeln!(out, "{err}")?;
        }
    }
    Ok(())
}

/// 🔒 비밀번호가 맞을 때만 계산
fn gated_averages(given: &str, password: &str) -> Result<Vec<String>, GateError> {
    check_password(given, password)?;
    Ok(averages(&SCORES)
        .enumerate()
        .map(|(index, avg)| format!("{}번, 평균 : {avg:?}", index + 1))
        .collect())
}

fn check_password(given: &str, password: &str) -> Result<(), GateError> {
    if given != password {
        return Err(GateError::WrongPassword);
    }
    Ok(())
}

fn averages(scores: &[(u32, u32)]) -> impl Iterator<Item = f64> + '_ {
    scores
        .iter()
        .map(|&(a, b)| f64::from(a + b) / 2.0)
}

/// 🧪 테스트 코드
