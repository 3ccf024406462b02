use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::models::{HorizonReturn, PricePoint};

/// Неизменяемый ряд цен на время одной оценки, ключ: календарная дата.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    points: BTreeMap<NaiveDate, PricePoint>,
}

impl PriceSeries {
    /// При повторе даты остаётся последняя точка
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = PricePoint>,
    {
        PriceSeries {
            points: points.into_iter().map(|p| (p.date, p)).collect(),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.points.get(&date)
    }
}

pub const DEFAULT_FORWARD_TOLERANCE_DAYS: u32 = 5;

/// Поиск цены на дату с проходом вперёд через выходные и праздники.
#[derive(Debug, Clone, Copy)]
pub struct PriceWindowLookup {
    tolerance_days: u32,
}

impl Default for PriceWindowLookup {
    fn default() -> Self {
        PriceWindowLookup::new(DEFAULT_FORWARD_TOLERANCE_DAYS)
    }
}

impl PriceWindowLookup {
    pub fn new(tolerance_days: u32) -> Self {
        PriceWindowLookup { tolerance_days }
    }

    /// Сначала точная дата, затем target+1 ..= target+tolerance. Первое попадание выигрывает.
    pub fn resolve<'a>(&self, series: &'a PriceSeries, target: NaiveDate) -> Option<&'a PricePoint> {
        (0..=self.tolerance_days).find_map(|offset| {
            target
                .checked_add_days(Days::new(offset as u64))
                .and_then(|date| series.get(date))
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnCalculator {
    lookup: PriceWindowLookup,
}

impl ReturnCalculator {
    pub fn new(lookup: PriceWindowLookup) -> Self {
        ReturnCalculator { lookup }
    }

    /// Доходность в процентах от открытия `anchor_date` до закрытия через `days` дней.
    pub fn forward_return(
        &self,
        anchor_date: NaiveDate,
        anchor_open: f64,
        series: &PriceSeries,
        days: u64,
    ) -> HorizonReturn {
        if anchor_open <= 0.0 {
            return HorizonReturn::NoData;
        }

        let forward = anchor_date
            .checked_add_days(Days::new(days))
            .and_then(|target| self.lookup.resolve(series, target));

        match forward {
            Some(point) => HorizonReturn::Computed {
                close: point.close,
                return_pct: (point.close - anchor_open) / anchor_open * 100.0,
            },
            None => HorizonReturn::NoData,
        }
    }
}
