pub mod abi;
pub mod contract_gateway;
pub mod json_rpc_wallet;
pub mod rpc_client;

pub use contract_gateway::ContractGateway;
pub use json_rpc_wallet::JsonRpcWallet;
pub use rpc_client::JsonRpcClient;
