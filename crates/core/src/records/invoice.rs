//! Supplier invoices and their payment.
//!
//! Row layout of the `facturas` tab:
//! `description | numero_factura | amount_bs | amount_dollars | currency | date | due_date |
//! type | supplier | rate | paid`

use std::sync::Arc;

use hornero_shared::types::{InvoiceId, UserId};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::expense::ExpenseService;
use super::mirror::SheetMirror;
use super::payroll::{PayrollRegistrar, PayrollTarget, is_payroll_type};
use super::ports::InvoiceRepository;
use super::sheet::{
    CellValue, ColumnFormat, INVOICE_PAID_COLUMN, INVOICES_SHEET, SpreadsheetClient,
};
use super::types::{ExpenseInput, Invoice, InvoiceInput, InvoicePayment, PayInvoiceInput};
use crate::currency::resolve_amounts;
use crate::exchange::ExchangeRateService;

const NUMERO_MAX_LEN: usize = 50;

/// Invoice service.
#[derive(Clone)]
pub struct InvoiceService {
    repo: Arc<dyn InvoiceRepository>,
    expenses: ExpenseService,
    payroll: PayrollRegistrar,
    mirror: SheetMirror,
    rates: ExchangeRateService,
}

impl InvoiceService {
    /// Creates a new service.
    pub fn new(
        repo: Arc<dyn InvoiceRepository>,
        expenses: ExpenseService,
        payroll: PayrollRegistrar,
        sheets: Arc<dyn SpreadsheetClient>,
        rates: ExchangeRateService,
    ) -> Self {
        Self {
            repo,
            expenses,
            payroll,
            mirror: SheetMirror::new(sheets),
            rates,
        }
    }

    /// Registers an invoice dated today at today's rate.
    pub async fn create_invoice(&self, input: &InvoiceInput) -> AppResult<Invoice> {
        Self::validate(input)?;
        let numero = input.numero_factura.trim();
        if self.repo.find_by_numero(numero).await?.is_some() {
            return Err(AppError::Validation(format!(
                "Invoice number {numero} is already registered"
            )));
        }

        let date = self.rates.clock().today();
        let rate = self.rates.require_rate(date).await?.rate;
        let amounts = resolve_amounts(input.amount, input.currency, rate)?;
        let supplier = input.supplier.trim();

        let now = self.rates.clock().now();
        let mut invoice = Invoice {
            id: InvoiceId::new(),
            supplier: supplier.to_string(),
            numero_factura: numero.to_string(),
            description: Invoice::describe(supplier, numero),
            date,
            due_date: input.due_date,
            amount_bs: amounts.amount_bs,
            amount_dollars: amounts.amount_dollars,
            currency: input.currency,
            kind: input.kind.trim().to_string(),
            sub_type: input.sub_type.trim().to_string(),
            payment_method: input.payment_method.trim().to_string(),
            paid: false,
            google_row: 0,
            rate,
            created_at: now,
            updated_at: now,
        };

        invoice.google_row = self
            .mirror
            .append(INVOICES_SHEET, &Self::row(&invoice), &Self::formats())
            .await?;
        self.repo.insert(&invoice).await?;

        info!(
            invoice_id = %invoice.id,
            numero = %invoice.numero_factura,
            row = invoice.google_row,
            "Invoice registered"
        );
        Ok(invoice)
    }

    /// Fetches an invoice.
    pub async fn get_invoice(&self, id: InvoiceId) -> AppResult<Invoice> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice", id))
    }

    /// Unpaid invoices, earliest due first.
    pub async fn list_unpaid_invoices(&self) -> AppResult<Vec<Invoice>> {
        self.repo.list_unpaid().await
    }

    /// Rewrites an unpaid invoice. Amounts are converted at the registration day's rate.
    pub async fn update_invoice(&self, id: InvoiceId, input: &InvoiceInput) -> AppResult<Invoice> {
        Self::validate(input)?;
        let current = self.get_invoice(id).await?;
        if current.paid {
            return Err(AppError::InvalidState(format!(
                "Invoice {} is already paid",
                current.numero_factura
            )));
        }

        let numero = input.numero_factura.trim();
        if numero != current.numero_factura {
            if let Some(other) = self.repo.find_by_numero(numero).await? {
                if other.id != id {
                    return Err(AppError::Validation(format!(
                        "Invoice number {numero} is already registered"
                    )));
                }
            }
        }

        let rate = self.rates.require_rate(current.date).await?.rate;
        let amounts = resolve_amounts(input.amount, input.currency, rate)?;
        let supplier = input.supplier.trim();

        let updated = Invoice {
            supplier: supplier.to_string(),
            numero_factura: numero.to_string(),
            description: Invoice::describe(supplier, numero),
            due_date: input.due_date,
            amount_bs: amounts.amount_bs,
            amount_dollars: amounts.amount_dollars,
            currency: input.currency,
            kind: input.kind.trim().to_string(),
            sub_type: input.sub_type.trim().to_string(),
            payment_method: input.payment_method.trim().to_string(),
            rate,
            updated_at: self.rates.clock().now(),
            ..current
        };

        self.mirror
            .overwrite(INVOICES_SHEET, updated.google_row, &Self::row(&updated))
            .await?;
        self.repo.replace(&updated).await?;
        info!(invoice_id = %id, row = updated.google_row, "Invoice updated");
        Ok(updated)
    }

    /// Erases the sheet row, then the local record.
    pub async fn delete_invoice(&self, id: InvoiceId) -> AppResult<()> {
        let invoice = self.get_invoice(id).await?;
        if invoice.paid {
            warn!(invoice_id = %id, "Deleting a paid invoice; its expense is kept");
        }
        self.mirror.erase(INVOICES_SHEET, invoice.google_row).await?;
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Invoice", id));
        }
        info!(invoice_id = %id, row = invoice.google_row, "Invoice deleted");
        Ok(())
    }

    /// Pays an invoice by booking an expense for it.
    ///
    /// The invoice's paid cell is ticked first, then the invoice is saved, then
    /// the expense is recorded. Payroll invoices also open an employee debt.
    pub async fn pay_invoice(
        &self,
        id: InvoiceId,
        input: &PayInvoiceInput,
        actor: UserId,
    ) -> AppResult<InvoicePayment> {
        let invoice = self.get_invoice(id).await?;
        if invoice.paid {
            return Err(AppError::InvalidState(format!(
                "Invoice {} is already paid",
                invoice.numero_factura
            )));
        }

        let date = input.date.unwrap_or_else(|| self.rates.clock().today());
        // Fails with RateNotFound before anything is written.
        self.rates.require_rate(date).await?;

        let kind = Self::pick(input.kind.as_deref(), &invoice.kind);
        let employee = if is_payroll_type(&kind) {
            let target = PayrollTarget {
                employee_id: input.employee_id,
                employee_name: input.employee_name.clone(),
            };
            Some(self.payroll.resolve_employee(&target).await?)
        } else {
            None
        };

        self.mirror
            .patch(
                INVOICES_SHEET,
                invoice.google_row,
                INVOICE_PAID_COLUMN,
                CellValue::Bool(true),
            )
            .await?;
        let invoice = Invoice {
            paid: true,
            updated_at: self.rates.clock().now(),
            ..invoice
        };
        self.repo.replace(&invoice).await?;

        let expense_input = ExpenseInput {
            description: invoice.description.clone(),
            amount: invoice.entered_amount(),
            currency: invoice.currency,
            date,
            kind,
            sub_type: Self::pick(input.sub_type.as_deref(), &invoice.sub_type),
            payment_method: Self::pick(input.payment_method.as_deref(), &invoice.payment_method),
            paid: true,
            employee_id: employee,
            employee_name: input.employee_name.clone(),
        };
        let expense = self
            .expenses
            .record(&expense_input, Some(invoice.id), actor)
            .await?;

        let debt = match employee {
            Some(employee_id) => {
                let notes = format!("Creado desde factura {}", invoice.numero_factura);
                self.payroll.register(&expense, employee_id, notes, actor).await?
            }
            None => None,
        };

        info!(
            invoice_id = %invoice.id,
            expense_id = %expense.id,
            payroll = debt.is_some(),
            "Invoice paid"
        );
        Ok(InvoicePayment {
            invoice,
            expense,
            debt,
        })
    }

    fn pick(choice: Option<&str>, fallback: &str) -> String {
        choice
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    fn validate(input: &InvoiceInput) -> AppResult<()> {
        if input.supplier.trim().is_empty() {
            return Err(AppError::Validation("Supplier is required".to_string()));
        }
        let numero = input.numero_factura.trim();
        if numero.is_empty() {
            return Err(AppError::Validation("Invoice number is required".to_string()));
        }
        if numero.chars().count() > NUMERO_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Invoice number cannot exceed {NUMERO_MAX_LEN} characters"
            )));
        }
        if input.kind.trim().is_empty() {
            return Err(AppError::Validation("Invoice type is required".to_string()));
        }
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Invoice amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn row(invoice: &Invoice) -> Vec<CellValue> {
        vec![
            invoice.description.clone().into(),
            invoice.numero_factura.clone().into(),
            invoice.amount_bs.into(),
            invoice.amount_dollars.into(),
            invoice.currency.symbol().into(),
            invoice.date.into(),
            invoice.due_date.into(),
            invoice.kind.clone().into(),
            invoice.supplier.clone().into(),
            invoice.rate.into(),
            invoice.paid.into(),
        ]
    }

    fn formats() -> [ColumnFormat; 5] {
        [
            ColumnFormat::bolivars('C'),
            ColumnFormat::dollars('D'),
            ColumnFormat::date('F'),
            ColumnFormat::date('G'),
            ColumnFormat::dollars('J'),
        ]
    }
}
