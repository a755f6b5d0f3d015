mod common;

use anyhow::Result;
use common::{item, test_service, Roster};
use fiado::application::AppError;
use fiado::domain::PaymentMethod;
use uuid::Uuid;

#[tokio::test]
async fn test_payment_reduces_debt_exactly() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let maria = Roster::maria(&service).await?;

    let updated = service.apply_payment(maria.id, 3000).await?;
    assert_eq!(updated.current_debt_cents, 5000);

    Ok(())
}

#[tokio::test]
async fn test_overpayment_clamps_to_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;
    // Spec scenario: debt 110.00 after an over-limit sale, payment of 150.00
    let maria = Roster::maria(&service).await?;
    service
        .register_sale(maria.id, vec![item("Rice", 3000)], PaymentMethod::Cash)
        .await?;

    let updated = service.apply_payment(maria.id, 15000).await?;
    assert_eq!(updated.current_debt_cents, 0, "clamped, not negative");

    Ok(())
}

#[tokio::test]
async fn test_exact_payment_settles_debt() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let maria = Roster::maria(&service).await?;

    let updated = service.apply_payment(maria.id, 8000).await?;
    assert_eq!(updated.current_debt_cents, 0);
    assert!(!updated.is_over_limit());

    Ok(())
}

#[tokio::test]
async fn test_non_positive_amount_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let maria = Roster::maria(&service).await?;

    for bad in [0, -100] {
        let result = service.apply_payment(maria.id, bad).await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }

    let after = service.get_customer_by_id(maria.id).await?;
    assert_eq!(after.current_debt_cents, 8000);

    Ok(())
}

#[tokio::test]
async fn test_payment_for_unknown_customer_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.apply_payment(Uuid::new_v4(), 1000).await;
    assert!(matches!(result, Err(AppError::CustomerNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_payment_leaves_sale_history_untouched() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let joao = Roster::joao(&service).await?;

    let registered = service
        .register_sale(joao.id, vec![item("Cafe", 1200)], PaymentMethod::Transfer)
        .await?;
    service.apply_payment(joao.id, 1200).await?;

    let sales = service.sales_for_customer(joao.id).await?;
    assert_eq!(sales.len(), 1, "payments never delete or alter sales");
    assert_eq!(sales[0].id, registered.sale.id);
    assert_eq!(sales[0].total_cents, 1200);

    let after = service.get_customer_by_id(joao.id).await?;
    assert_eq!(after.current_debt_cents, 0);

    Ok(())
}

#[tokio::test]
async fn test_debt_can_be_rebuilt_after_settling() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let joao = Roster::joao(&service).await?;

    service
        .register_sale(joao.id, vec![item("Pao", 150)], PaymentMethod::Cash)
        .await?;
    service.apply_payment(joao.id, 150).await?;
    let result = service
        .register_sale(joao.id, vec![item("Leite", 500)], PaymentMethod::Cash)
        .await?;

    assert_eq!(result.customer.current_debt_cents, 500);
    assert_eq!(service.sales_for_customer(joao.id).await?.len(), 2);

    Ok(())
}
