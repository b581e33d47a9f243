use std::io::{BufRead, Write};

use crate::{
    error::PipelineError,
    models::{PipelineState, RequirementsInput, UserInput},
    services::InputCollector,
};

/// Interactive collector reading one answer per line
///
/// Generic over reader and writer so tests can drive it with in-memory
/// buffers.
pub struct StdinCollector<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StdinCollector<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn prompt(&mut self, hint: Option<&str>, label: &str) -> Result<String, PipelineError> {
        if let Some(hint) = hint {
            writeln!(self.writer, "\n{}", hint).map_err(io_error)?;
        }
        write!(self.writer, "{}: ", label).map_err(io_error)?;
        self.writer.flush().map_err(io_error)?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(io_error)?;
        Ok(line.trim().to_string())
    }
}

fn io_error(err: std::io::Error) -> PipelineError {
    PipelineError::InvalidInput(format!("입력을 읽을 수 없습니다: {}", err))
}

impl<R: BufRead, W: Write> InputCollector for StdinCollector<R, W> {
    fn collect(&mut self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let raw_age = self.prompt(None, "나이를 입력하세요")?;
        let age = raw_age.parse::<u32>().map_err(|_| {
            PipelineError::InvalidInput(format!("나이는 숫자로 입력해야 합니다: '{}'", raw_age))
        })?;

        let cuisine_preference = self.prompt(None, "선호하는 음식 종류를 입력하세요")?;
        let weather = self.prompt(None, "현재 날씨를 입력하세요")?;
        let location = self.prompt(None, "지역을 입력하세요")?;
        let companion_type = self.prompt(
            Some("예시: 혼밥, 데이트, 가족식사, 친구모임, 회식"),
            "동반자유형",
        )?;
        let ambiance = self.prompt(
            Some("예시: 시끌벅적한, 조용한, 아늑한, 인스타감성, 전통적인"),
            "분위기",
        )?;
        let special_requirements = self.prompt(
            Some("여러 개는 쉼표로 구분, 없으면 '없음' 또는 빈 값"),
            "특별 요구사항",
        )?;

        // Same bounds check as requests parsed over HTTP
        let mut input = UserInput {
            age,
            cuisine_preference,
            weather,
            location,
            companion_type,
            ambiance,
            special_requirements: RequirementsInput::Text(special_requirements),
        };
        input.collect(state)
    }
}

/// Removes markdown emphasis and heading markers for plain console output
pub fn strip_markdown(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line
                .strip_prefix("## ")
                .or_else(|| line.strip_prefix("# "))
                .unwrap_or(line);
            line.replace("**", "").replace('*', "")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints the final state the way the console front end shows it
pub fn print_results<W: Write>(state: &PipelineState, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n---최종 결과---")?;
    if !state.recommendations.is_empty() {
        writeln!(out, "추천된 맛집:")?;
        for recommendation in &state.recommendations {
            writeln!(out, "- {}", strip_markdown(recommendation))?;
        }
    }
    if let Some(error) = state.error.as_deref().filter(|e| !e.is_empty()) {
        writeln!(out, "오류: {}", error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect_from(script: &str) -> (Result<(), PipelineError>, PipelineState, String) {
        let mut output = Vec::new();
        let mut state = PipelineState::new();
        let result = {
            let mut collector = StdinCollector::new(Cursor::new(script.as_bytes()), &mut output);
            collector.collect(&mut state)
        };
        (result, state, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_collects_every_field() {
        let (result, state, output) =
            collect_from("28\n한식\n비\n강남\n데이트\n조용한\n주차 가능, 없음\n");

        assert!(result.is_ok());
        assert_eq!(state.age, 28);
        assert_eq!(state.cuisine_preference, "한식");
        assert_eq!(state.weather, "비");
        assert_eq!(state.location, "강남");
        assert_eq!(state.companion_type, "데이트");
        assert_eq!(state.ambiance, "조용한");
        assert_eq!(state.special_requirements, vec!["주차 가능".to_string()]);
        assert!(output.contains("나이를 입력하세요: "));
        assert!(output.contains("특별 요구사항: "));
    }

    #[test]
    fn test_non_numeric_age_is_invalid_input() {
        let (result, state, _) = collect_from("스물\n한식\n");

        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
        assert!(state.location.is_empty());
    }

    #[test]
    fn test_age_over_limit_is_rejected() {
        let (result, _, _) = collect_from("121\n한식\n맑음\n종로\n\n\n\n");
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn test_strip_markdown() {
        let text = "## 추천\n**강남 한옥집**: *분위기* 좋음";
        assert_eq!(strip_markdown(text), "추천\n강남 한옥집: 분위기 좋음");
    }

    #[test]
    fn test_print_results_shows_recommendations_and_error() {
        let mut state = PipelineState::new();
        state.recommendations = vec!["**1. 강남 한옥집**".to_string()];
        let mut out = Vec::new();
        print_results(&state, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("추천된 맛집:"));
        assert!(text.contains("- 1. 강남 한옥집"));
        assert!(!text.contains("오류"));

        let mut failed = PipelineState::new();
        failed.error = Some("검색 결과가 없습니다".to_string());
        let mut out = Vec::new();
        print_results(&failed, &mut out).unwrap();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("오류: 검색 결과가 없습니다"));
    }
}
