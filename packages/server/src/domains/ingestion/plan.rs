use crate::common::{Source, SourceQuery};

/// Keywords crawled for one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKeywords {
    pub source: Source,
    pub keywords: Vec<String>,
}

impl SourceKeywords {
    pub fn new<I, S>(source: Source, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// What a single ingestion run crawls, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionPlan {
    pub entries: Vec<SourceKeywords>,
}

impl IngestionPlan {
    pub fn new(entries: Vec<SourceKeywords>) -> Self {
        Self { entries }
    }

    /// Flattened unit-of-work order for a run
    pub fn queries(&self) -> impl Iterator<Item = SourceQuery> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .keywords
                .iter()
                .map(move |keyword| SourceQuery::new(keyword.clone(), entry.source))
        })
    }
}

impl Default for IngestionPlan {
    /// Gift-oriented keyword sets used by the daily crawl
    fn default() -> Self {
        Self::new(vec![
            SourceKeywords::new(
                Source::Naver,
                [
                    "현금 박스",
                    "부모님 신발",
                    "건강식품",
                    "헬스가방",
                    "핸드크림",
                    "디퓨저",
                    "오설록 티세트",
                    "휴지",
                    "초콜릿",
                    "수제 초콜릿 키트",
                    "파자마세트",
                ],
            ),
            SourceKeywords::new(Source::Coupang, ["안마기기", "무선이어폰", "스마트워치"]),
            SourceKeywords::new(
                Source::Kream,
                [
                    "남성 지갑",
                    "남성 스니커즈",
                    "백팩",
                    "토트백",
                    "크로스백",
                    "벨트",
                    "선글라스",
                    "향수",
                    "여성 지갑",
                    "여성 스니커즈",
                    "숄더백",
                    "목걸이",
                    "텀블러",
                    "립밤",
                    "조명",
                    "핸드워시",
                    "식기",
                ],
            ),
        ])
    }
}
