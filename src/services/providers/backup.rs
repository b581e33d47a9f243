/// Built-in restaurant catalogue
///
/// Non-networked backup used when web search is unusable. Matches query
/// tokens against each entry's location and cuisine tags: entries matching
/// both win, cuisine-only matches are the second tier.
use crate::{error::SearchError, models::SearchResult, services::providers::SearchProvider};

const PROVIDER_NAME: &str = "backup";

struct CatalogEntry {
    name: &'static str,
    location: &'static str,
    cuisine: &'static str,
    description: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "강남 한옥집",
        location: "강남",
        cuisine: "한식",
        description: "김치찜과 보쌈 정식이 대표 메뉴인 아늑한 한옥 분위기의 한식당. 1인 15,000원대.",
    },
    CatalogEntry {
        name: "논현 국밥거리 순대국",
        location: "강남",
        cuisine: "한식",
        description: "24시간 운영하는 진한 국물의 순대국밥 전문점. 비 오는 날 대기 줄이 길다. 1인 10,000원대.",
    },
    CatalogEntry {
        name: "신사 스시 오마카세",
        location: "강남",
        cuisine: "일식",
        description: "조용한 카운터석 위주의 오마카세. 데이트와 기념일에 적합. 디너 100,000원대.",
    },
    CatalogEntry {
        name: "역삼 딤섬하우스",
        location: "강남",
        cuisine: "중식",
        description: "샤오롱바오와 새우 하가우가 인기인 딤섬 전문점. 단체 룸 보유. 1인 25,000원대.",
    },
    CatalogEntry {
        name: "홍대 화덕피자",
        location: "홍대",
        cuisine: "양식",
        description: "장작 화덕에서 굽는 나폴리 피자. 시끌벅적한 분위기로 친구 모임에 좋다. 1인 20,000원대.",
    },
    CatalogEntry {
        name: "연남 칼국수",
        location: "홍대",
        cuisine: "한식",
        description: "바지락 칼국수와 수제 만두가 대표 메뉴. 흐리거나 쌀쌀한 날 인기. 1인 9,000원대.",
    },
    CatalogEntry {
        name: "합정 라멘 연구소",
        location: "홍대",
        cuisine: "일식",
        description: "돈코츠 라멘 전문. 혼밥 카운터석 완비. 1인 12,000원대.",
    },
    CatalogEntry {
        name: "종로 전통 한정식",
        location: "종로",
        cuisine: "한식",
        description: "궁중 요리 코스를 내는 전통 한정식집. 가족식사와 회식에 적합, 주차 가능. 1인 45,000원대.",
    },
    CatalogEntry {
        name: "익선동 마라샹궈",
        location: "종로",
        cuisine: "중식",
        description: "인스타감성 인테리어의 마라 전문점. 맵기 단계 선택 가능. 1인 18,000원대.",
    },
    CatalogEntry {
        name: "해운대 물회집",
        location: "부산",
        cuisine: "한식",
        description: "더운 날 시원한 물회와 회덮밥. 바다 뷰 좋은 창가석. 1인 20,000원대.",
    },
    CatalogEntry {
        name: "서면 돼지국밥",
        location: "부산",
        cuisine: "한식",
        description: "부산식 맑은 돼지국밥. 수육 백반이 대표 메뉴. 1인 10,000원대.",
    },
    CatalogEntry {
        name: "광안리 파스타 바",
        location: "부산",
        cuisine: "양식",
        description: "광안대교 야경이 보이는 파스타 바. 데이트 코스로 인기. 1인 28,000원대.",
    },
];

impl From<&CatalogEntry> for SearchResult {
    fn from(entry: &CatalogEntry) -> Self {
        SearchResult {
            title: entry.name.to_string(),
            description: entry.description.to_string(),
            link: format!("https://map.naver.com/p/search/{}", entry.name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackupCatalogProvider;

impl BackupCatalogProvider {
    pub fn new() -> Self {
        Self
    }

    fn lookup(&self, query: &str) -> Vec<SearchResult> {
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let has = |tag: &str| tokens.iter().any(|t| *t == tag);

        let exact: Vec<SearchResult> = CATALOG
            .iter()
            .filter(|e| has(e.location) && has(e.cuisine))
            .map(SearchResult::from)
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        CATALOG
            .iter()
            .filter(|e| has(e.cuisine))
            .map(SearchResult::from)
            .collect()
    }
}

#[async_trait::async_trait]
impl SearchProvider for BackupCatalogProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let results = self.lookup(query);

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = PROVIDER_NAME,
            "Catalogue lookup completed"
        );

        Ok(results)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
