use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render `value` as JSON / YAML, or with `human` for the human format.
    pub fn render<T, F>(&self, value: &T, human: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        Ok(match self {
            OutputFormat::Human => human(value),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        })
    }

    pub fn print<T, F>(&self, value: &T, human: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        let rendered = self.render(value, human)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        expression: &'static str,
        score: u8,
    }

    #[test]
    fn renders_each_format() {
        let sample = Sample {
            expression: "#title",
            score: 92,
        };
        let human = OutputFormat::Human
            .render(&sample, |s| format!("{} {}", s.score, s.expression))
            .unwrap();
        assert_eq!(human, "92 #title");

        let json = OutputFormat::Json.render(&sample, |_| String::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 92);

        let yaml = OutputFormat::Yaml.render(&sample, |_| String::new()).unwrap();
        assert!(yaml.contains("#title"));
        assert!(yaml.contains("score: 92"));
    }
}
