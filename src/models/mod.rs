pub mod inventory;
pub mod invoice;
pub mod receipt;
pub mod reference;
pub mod report;
pub mod returns;

pub use inventory::{ChangeType, InventoryChangeItem, InventoryChangeRecord};
pub use invoice::{invoice_id_of, InvoiceItem, InvoiceSummary, SettlementType};
pub use receipt::ReceiptSummary;
pub use reference::{Customer, PaymentAccount, Product, ReferenceEntity, Salesperson, Warehouse};
pub use report::{
    DashboardReport, EntitySummaryRow, InactiveCustomerRow, InventoryMovementRow,
    InvoiceBalanceRow, PaidSalesSplit, ProductSalesRow, RankedRow, RevenueOverview,
};
pub use returns::{ReturnItem, ReturnOrder};
