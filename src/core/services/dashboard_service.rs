use crate::api::models::{Computer, InventorySummary};
use crate::core::services::traits::InventoryApi;
use crate::error::{ApiError, CliError, ServiceError};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Statistic cards of the dashboard. The title doubles as the key of
/// `POST /filter-data/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticCard {
    All,
    Working,
    NotWorking,
    Internet,
    NoInternet,
    Webcams,
    Printers,
    Scanners,
    Mfps,
}

impl StatisticCard {
    pub const ALL: [StatisticCard; 9] = [
        StatisticCard::All,
        StatisticCard::Working,
        StatisticCard::NotWorking,
        StatisticCard::Internet,
        StatisticCard::NoInternet,
        StatisticCard::Webcams,
        StatisticCard::Printers,
        StatisticCard::Scanners,
        StatisticCard::Mfps,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StatisticCard::All => "Все компьютеры",
            StatisticCard::Working => "Рабочие компьютеры",
            StatisticCard::NotWorking => "Не рабочие компьютеры",
            StatisticCard::Internet => "Интернет",
            StatisticCard::NoInternet => "Нет интернета",
            StatisticCard::Webcams => "Веб-камеры",
            StatisticCard::Printers => "Принтеры",
            StatisticCard::Scanners => "Сканеры",
            StatisticCard::Mfps => "МФУ",
        }
    }

    /// Short ASCII alias accepted on the command line
    pub fn alias(&self) -> &'static str {
        match self {
            StatisticCard::All => "all",
            StatisticCard::Working => "working",
            StatisticCard::NotWorking => "not-working",
            StatisticCard::Internet => "internet",
            StatisticCard::NoInternet => "no-internet",
            StatisticCard::Webcams => "webcams",
            StatisticCard::Printers => "printers",
            StatisticCard::Scanners => "scanners",
            StatisticCard::Mfps => "mfps",
        }
    }

    pub fn count(&self, summary: &InventorySummary) -> u64 {
        match self {
            StatisticCard::All => summary.all_compyuters_count,
            StatisticCard::Working => summary.all_worked_compyuters_count,
            StatisticCard::NotWorking => summary.all_noworked_compyuters_count,
            StatisticCard::Internet => summary.all_compyuters_with_net,
            StatisticCard::NoInternet => summary.all_compyuters_with_no_net,
            StatisticCard::Webcams => summary.all_compyuters_with_webcam,
            StatisticCard::Printers => summary.all_compyuters_with_printer,
            StatisticCard::Scanners => summary.all_compyuters_with_scaner,
            StatisticCard::Mfps => summary.all_compyuters_with_mfo,
        }
    }
}

impl fmt::Display for StatisticCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for StatisticCard {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StatisticCard::ALL
            .iter()
            .copied()
            .find(|card| card.title().to_lowercase() == wanted || card.alias() == wanted)
            .ok_or_else(|| CliError::UnknownStatistic {
                title: s.trim().to_string(),
            })
    }
}

/// Card with its current count
#[derive(Debug, Clone, PartialEq)]
pub struct CardCount {
    pub card: StatisticCard,
    pub count: u64,
}

pub struct DashboardService<A: InventoryApi> {
    api: Arc<A>,
}

impl<A: InventoryApi> DashboardService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// All nine cards in dashboard order
    pub async fn cards(&self) -> Result<Vec<CardCount>, ServiceError> {
        let summary = self.api.summary().await?;
        Ok(StatisticCard::ALL
            .iter()
            .map(|card| CardCount {
                card: *card,
                count: card.count(&summary),
            })
            .collect())
    }

    /// Rows behind one card
    pub async fn preselect(&self, card: StatisticCard) -> Result<Vec<Computer>, ServiceError> {
        self.api
            .statistic_rows(card.title())
            .await
            .map_err(|e| match e {
                ApiError::Http { status: 404, .. } => ServiceError::NotFound {
                    resource_type: "Statistic".to_string(),
                    key: card.title().to_string(),
                },
                _ => ServiceError::Api(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::traits::mock::MockInventory;

    #[test]
    fn test_card_from_title_and_alias() {
        assert_eq!(
            "Нет интернета".parse::<StatisticCard>().unwrap(),
            StatisticCard::NoInternet
        );
        assert_eq!("мфу".parse::<StatisticCard>().unwrap(), StatisticCard::Mfps);
        assert_eq!("printers".parse::<StatisticCard>().unwrap(), StatisticCard::Printers);

        match "Мониторы".parse::<StatisticCard>() {
            Err(CliError::UnknownStatistic { title }) => assert_eq!(title, "Мониторы"),
            other => panic!("Expected UnknownStatistic, got {:?}", other),
        }
    }

    #[test]
    fn test_card_counts_map_summary_fields() {
        let summary = InventorySummary {
            all_compyuters_count: 120,
            all_compyuters_with_scaner: 7,
            ..Default::default()
        };
        assert_eq!(StatisticCard::All.count(&summary), 120);
        assert_eq!(StatisticCard::Scanners.count(&summary), 7);
        assert_eq!(StatisticCard::Webcams.count(&summary), 0);
    }

    #[tokio::test]
    async fn test_cards_in_dashboard_order() {
        let api = MockInventory {
            summary: InventorySummary {
                all_compyuters_count: 10,
                all_compyuters_with_mfo: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let service = DashboardService::new(Arc::new(api));

        let cards = service.cards().await.unwrap();
        assert_eq!(cards.len(), 9);
        assert_eq!(cards[0].card, StatisticCard::All);
        assert_eq!(cards[0].count, 10);
        assert_eq!(cards[8].card, StatisticCard::Mfps);
        assert_eq!(cards[8].count, 2);
    }

    #[tokio::test]
    async fn test_preselect_posts_card_title() {
        let mut api = MockInventory::default();
        api.statistics.insert(
            "Принтеры".to_string(),
            vec![Computer {
                slug: "pc-1".to_string(),
                ..Default::default()
            }],
        );
        let api = Arc::new(api);
        let service = DashboardService::new(api.clone());

        let rows = service.preselect(StatisticCard::Printers).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            api.statistic_calls.lock().unwrap().as_slice(),
            ["Принтеры".to_string()]
        );

        let result = service.preselect(StatisticCard::Scanners).await;
        assert!(matches!(result, Err(ServiceError::Api(_))));
    }
}
