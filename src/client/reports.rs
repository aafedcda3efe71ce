//! Batch loaders for the two report pages.
//!
//! Each page issues its whole batch of view queries concurrently and blocks
//! on all of them; one failed query fails the page load as a unit. The view
//! definitions live in the database — this module only selects from them.

use futures::try_join;
use serde_json::Value;

use super::{ClientError, DashboardClient};
use crate::chart::ChartRow;

/// Shared reference lists driving the page filters.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub farms: Vec<String>,
    pub varieties: Vec<String>,
    pub products: Vec<String>,
}

/// All datasets one report page renders. The weekly and monthly pages share
/// the shape; only the views they select from differ.
#[derive(Debug, Clone, Default)]
pub struct SalesBudgetReport {
    pub reference: ReferenceData,
    pub summary_chart_dollars_cases: Vec<ChartRow>,
    pub summary_table_dollars: Vec<ChartRow>,
    pub summary_table_cases: Vec<ChartRow>,
    pub summary_chart_pounds: Vec<ChartRow>,
    pub product_chart_dollars_cases: Vec<ChartRow>,
    pub product_table_dollars: Vec<ChartRow>,
    pub product_table_cases: Vec<ChartRow>,
    pub variety_table_pounds: Vec<ChartRow>,
}

/// Load the filter reference lists (farms, varieties, grade-1 products).
pub async fn load_reference(client: &DashboardClient) -> Result<ReferenceData, ClientError> {
    let (farms, varieties, products) = try_join!(
        client.query(r#"SELECT "Farm" FROM public.global_farms ORDER BY "Index" ASC"#),
        client.query("SELECT variety FROM public.global_varieties ORDER BY index ASC"),
        client.query(
            r#"SELECT "ProductCode" FROM public.product_details WHERE "Grade" = 1
                AND "ProductCode" <> 'KF' AND "ProductCode" <> 'JF' ORDER BY "Index" ASC"#
        ),
    )?;

    Ok(ReferenceData {
        farms: column_strings(&farms, "Farm"),
        varieties: column_strings(&varieties, "variety"),
        products: column_strings(&products, "ProductCode"),
    })
}

/// Load everything the weekly budget page renders.
pub async fn load_weekly(client: &DashboardClient) -> Result<SalesBudgetReport, ClientError> {
    let (
        reference,
        summary_chart_dollars_cases,
        summary_table_dollars,
        summary_table_cases,
        summary_chart_pounds,
        product_chart_dollars_cases,
        product_table_dollars,
        product_table_cases,
        variety_table_pounds,
    ) = try_join!(
        load_reference(client),
        client.query(
            r#"SELECT * FROM public.sales_budget_weekly_summary_chart_dollars_cases
                ORDER BY "ISOYear" DESC, "DataLabel" DESC, "ISOWeek""#
        ),
        client.query("SELECT * FROM public.sales_budget_weekly_summary_table_dollars"),
        client.query("SELECT * FROM public.sales_budget_weekly_summary_table_cases"),
        client.query("SELECT * FROM public.sales_budget_weekly_summary_chart_pounds"),
        client.query(
            r#"SELECT * FROM public.sales_budget_weekly_product_chart_dollars_cases
                ORDER BY "ISOYear" DESC, "DataLabel" DESC, "ISOWeek""#
        ),
        client.query("SELECT * FROM public.sales_budget_weekly_product_table_dollars"),
        client.query("SELECT * FROM public.sales_budget_weekly_product_table_cases"),
        client.query("SELECT * FROM public.sales_budget_weekly_variety_table_pounds"),
    )?;

    Ok(SalesBudgetReport {
        reference,
        summary_chart_dollars_cases,
        summary_table_dollars,
        summary_table_cases,
        summary_chart_pounds,
        product_chart_dollars_cases,
        product_table_dollars,
        product_table_cases,
        variety_table_pounds,
    })
}

/// Load everything the monthly budget page renders.
pub async fn load_monthly(client: &DashboardClient) -> Result<SalesBudgetReport, ClientError> {
    let (
        reference,
        summary_chart_dollars_cases,
        summary_table_dollars,
        summary_table_cases,
        summary_chart_pounds,
        product_chart_dollars_cases,
        product_table_dollars,
        product_table_cases,
        variety_table_pounds,
    ) = try_join!(
        load_reference(client),
        client.query(
            r#"SELECT * FROM public.sales_budget_monthly_summary_chart_dollars_cases
                ORDER BY "Year" DESC, "DataLabel" DESC, "Month""#
        ),
        client.query("SELECT * FROM public.sales_budget_monthly_summary_table_dollars"),
        client.query("SELECT * FROM public.sales_budget_monthly_summary_table_cases"),
        client.query(
            r#"SELECT * FROM public.sales_budget_monthly_summary_chart_pounds
                ORDER BY "Year" DESC, "DataLabel" DESC, "Month""#
        ),
        client.query(
            r#"SELECT * FROM public.sales_budget_monthly_product_chart_dollars_cases
                ORDER BY "Year" DESC, "DataLabel" DESC, "Month""#
        ),
        client.query("SELECT * FROM public.sales_budget_monthly_product_table_dollars"),
        client.query("SELECT * FROM public.sales_budget_monthly_product_table_cases"),
        client.query("SELECT * FROM public.sales_budget_monthly_variety_table_pounds"),
    )?;

    Ok(SalesBudgetReport {
        reference,
        summary_chart_dollars_cases,
        summary_table_dollars,
        summary_table_cases,
        summary_chart_pounds,
        product_chart_dollars_cases,
        product_table_dollars,
        product_table_cases,
        variety_table_pounds,
    })
}

/// Pull one string column out of a row set, dropping rows where the field is
/// absent or non-text.
fn column_strings(rows: &[ChartRow], field: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| match row.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(field: &str, value: Value) -> ChartRow {
        let mut map = ChartRow::new();
        map.insert(field.to_string(), value);
        map
    }

    #[test]
    fn column_strings_keeps_order_and_drops_non_text() {
        let rows = vec![
            row("Farm", json!("North Field")),
            row("Farm", json!(42)),
            row("Farm", json!("South Field")),
            row("Other", json!("ignored")),
        ];
        assert_eq!(
            column_strings(&rows, "Farm"),
            vec!["North Field", "South Field"]
        );
    }
}
