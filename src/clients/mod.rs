pub mod discord;
pub mod mercadopago;
