use crate::domain::bill::{Bill, RevenueBreakdown};
use crate::domain::food_order::{FoodOrder, OrderStats};
use crate::domain::loyalty::LoyaltyMember;
use crate::domain::money::Money;
use crate::error::Result;
use std::io::Write;

/// Writes ledger state as CSV sections, each with its own header row.
///
/// Sections are separated by a blank line. Amounts are written normalized
/// (`100` rather than `100.00`).
pub struct ReportWriter<W: Write> {
    out: W,
    sections: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, sections: 0 }
    }

    pub fn write_bills(&mut self, bills: &[Bill]) -> Result<()> {
        self.section(
            &[
                "bill",
                "booking",
                "room_charges",
                "food_charges",
                "amenities_charges",
                "taxes",
                "total",
                "total_paid",
                "payments",
                "status",
            ],
            bills.iter().map(|bill| {
                vec![
                    bill.id.clone(),
                    bill.booking_id.clone(),
                    amount(bill.charges.room_charges),
                    amount(bill.charges.food_charges()),
                    amount(bill.charges.amenities_charges),
                    amount(bill.charges.taxes),
                    amount(bill.charges.total()),
                    amount(bill.total_paid()),
                    bill.payments().len().to_string(),
                    bill.status().as_str().to_string(),
                ]
            }),
        )
    }

    pub fn write_members(&mut self, members: &[LoyaltyMember]) -> Result<()> {
        self.section(
            &["member", "name", "points", "tier", "discount_percent", "benefits"],
            members.iter().map(|member| {
                let tier = member.tier();
                vec![
                    member.id.clone(),
                    member.name.clone(),
                    member.points().to_string(),
                    tier.as_str().to_string(),
                    tier.discount_percent().to_string(),
                    member.benefits().len().to_string(),
                ]
            }),
        )
    }

    pub fn write_orders(&mut self, orders: &[FoodOrder]) -> Result<()> {
        self.section(
            &["order", "booking", "room", "kind", "status", "items", "total", "created_by"],
            orders.iter().map(|order| {
                vec![
                    order.id.clone(),
                    order.booking_id.clone().unwrap_or_default(),
                    order.room_number.clone().unwrap_or_default(),
                    order.kind.as_str().to_string(),
                    order.status.as_str().to_string(),
                    order.items().len().to_string(),
                    amount(order.total()),
                    order.created_by.clone(),
                ]
            }),
        )
    }

    pub fn write_order_stats(&mut self, stats: &OrderStats) -> Result<()> {
        self.section(
            &["pending", "preparing", "delivered", "cancelled", "total"],
            std::iter::once(
                [stats.pending, stats.preparing, stats.delivered, stats.cancelled, stats.total]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            ),
        )
    }

    pub fn write_revenue(&mut self, revenue: &RevenueBreakdown) -> Result<()> {
        self.section(
            &["room_charges", "food_charges", "amenities_charges", "taxes", "total"],
            std::iter::once(vec![
                amount(revenue.room_charges),
                amount(revenue.food_charges),
                amount(revenue.amenities_charges),
                amount(revenue.taxes),
                amount(revenue.total),
            ]),
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn section(
        &mut self,
        header: &[&str],
        rows: impl Iterator<Item = Vec<String>>,
    ) -> Result<()> {
        if self.sections > 0 {
            writeln!(self.out)?;
        }
        self.sections += 1;

        let mut writer = csv::Writer::from_writer(&mut self.out);
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn amount(money: Money) -> String {
    money.normalized().to_string()
}
