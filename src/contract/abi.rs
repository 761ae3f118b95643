//! Contract bindings for the bonding registry and ERC-20 tokens

use alloy_sol_types::sol;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract Bonding {
        struct Data {
            address token;
            string name;
            string _name;
            string ticker;
            uint256 supply;
            uint256 price;
            uint256 marketCap;
            uint256 liquidity;
            uint256 volume;
            uint256 volume24H;
            uint256 prevPrice;
            uint256 lastUpdated;
        }

        event Launched(address indexed token, address indexed pair, uint256 index);

        function fee() external view returns (uint256);
        function router() external view returns (address);

        function tokenInfo(address token) external view returns (
            address creator,
            address token,
            address pair,
            address agentToken,
            Data data,
            string description,
            string image,
            bool trading,
            bool tradingOnUniswap
        );

        function launch(
            string _name,
            string _ticker,
            uint8[] cores,
            string desc,
            string img,
            uint256 purchaseAmount
        ) external returns (address token, address pair, uint256 index);

        function buy(uint256 amountIn, address tokenAddress) external payable returns (bool);
        function sell(uint256 amountIn, address tokenAddress) external returns (bool);
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}
